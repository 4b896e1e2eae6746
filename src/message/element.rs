//! # Message content elements
//!
//! The typed pieces a chat message is built from, before layout: text
//! runs, inline images, emotes, timestamps, and moderation icons. Each
//! element knows how to contribute zero or more [`LayoutPiece`]s to a
//! [`LayoutContainer`] — the single dispatch point for layout behavior.
//!
//! ## Visibility flags
//!
//! Every element carries a bitmask of the rendering contexts it belongs
//! to. A layout pass supplies its own mask; an element whose flags do not
//! intersect it contributes nothing. This is how the same message renders
//! with timestamps on or off, with emote images or their text names, and
//! with or without moderation tools, without rebuilding the message.

use std::sync::{Arc, Mutex};

use bitflags::bitflags;
use chrono::{Local, NaiveTime};
use log::warn;

use crate::layout::container::LayoutContainer;
use crate::layout::metrics::FontStyle;
use crate::layout::piece::LayoutPiece;
use crate::layout::DEFAULT_TIMESTAMP_FORMAT;

/// Moderation icons are square, this many pixels per side at scale 1.0.
const MODERATION_ICON_SIZE: f32 = 16.0;

bitflags! {
    /// Rendering contexts an element participates in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ElementFlags: u32 {
        const MISC            = 0x01;
        const TEXT            = 0x02;
        const USERNAME        = 0x04;
        const TIMESTAMP       = 0x08;
        /// Render emotes as images. When absent from a pass's mask,
        /// emotes fall back to their text names.
        const EMOTE_IMAGES    = 0x10;
        const MODERATOR_TOOLS = 0x20;
        /// System/status content (timeouts, notices).
        const SYSTEM          = 0x40;

        /// Everything a plain channel view shows.
        const DEFAULT = Self::MISC.bits()
            | Self::TEXT.bits()
            | Self::USERNAME.bits()
            | Self::TIMESTAMP.bits()
            | Self::EMOTE_IMAGES.bits()
            | Self::SYSTEM.bits();
    }
}

/// Click/action payload attached to a piece for later dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Link {
    Url(String),
    UserInfo(String),
    UserAction(String),
}

/// An already-resolved image resource with known pixel dimensions.
///
/// Elements reference bitmaps by identity (`Arc`) and never own them;
/// fetching and caching are a collaborator's concern.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pub name: String,
    /// Natural pixel dimensions of the bitmap data.
    pub width: f32,
    pub height: f32,
    /// Factor from natural to logical size: a 2x emote carries 0.5 so it
    /// renders at the same logical size as its 1x sibling.
    pub scale: f32,
    pub tooltip: String,
}

impl Bitmap {
    pub fn new(name: impl Into<String>, width: f32, height: f32, scale: f32) -> Self {
        let name = name.into();
        Self {
            tooltip: name.clone(),
            name,
            width,
            height,
            scale,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    /// Logical width (natural width × intrinsic scale).
    pub fn scaled_width(&self) -> f32 {
        self.width * self.scale
    }

    pub fn scaled_height(&self) -> f32 {
        self.height * self.scale
    }
}

/// Resolution tiers available for one emote. Tier 1 is always present;
/// higher tiers are optional and fall back silently.
#[derive(Clone, Debug, PartialEq)]
pub struct EmoteImages {
    pub x1: Arc<Bitmap>,
    pub x2: Option<Arc<Bitmap>>,
    pub x3: Option<Arc<Bitmap>>,
}

impl EmoteImages {
    pub fn name(&self) -> &str {
        &self.x1.name
    }

    /// Best available tier for the given quality preference.
    fn select(&self, quality: u8) -> &Arc<Bitmap> {
        if quality == 3
            && let Some(x3) = &self.x3
        {
            x3
        } else if quality >= 2
            && let Some(x2) = &self.x2
        {
            x2
        } else {
            &self.x1
        }
    }
}

/// One semantic unit of message content prior to layout.
///
/// Construction is fluent, mirroring how messages are assembled by an
/// ingestion layer:
///
/// ```
/// use weft::message::element::{ContentElement, ElementFlags, Link};
/// use weft::layout::FontStyle;
///
/// let el = ContentElement::text("forsen", ElementFlags::USERNAME, FontStyle::MediumBold)
///     .with_link(Link::UserInfo("forsen".into()))
///     .with_trailing_space(false);
/// ```
#[derive(Debug)]
pub struct ContentElement {
    flags: ElementFlags,
    link: Option<Link>,
    tooltip: Option<String>,
    trailing_space: bool,
    kind: ElementKind,
}

#[derive(Debug)]
enum ElementKind {
    Text(TextElement),
    Image(ImageElement),
    Emote(EmoteElement),
    Timestamp(TimestampElement),
    Moderation,
}

impl ContentElement {
    fn with_kind(flags: ElementFlags, kind: ElementKind) -> Self {
        Self {
            flags,
            link: None,
            tooltip: None,
            trailing_space: true,
            kind,
        }
    }

    /// A text run; split into words on spaces at construction.
    pub fn text(text: &str, flags: ElementFlags, style: FontStyle) -> Self {
        Self::with_kind(flags, ElementKind::Text(TextElement::new(text, style)))
    }

    /// An inline image placed at its logical size.
    pub fn image(image: Arc<Bitmap>, flags: ElementFlags) -> Self {
        let tooltip = image.tooltip.clone();
        Self::with_kind(flags, ElementKind::Image(ImageElement { image })).with_tooltip(tooltip)
    }

    /// An emote: an image with resolution tiers and a text-name fallback
    /// used when the pass excludes [`ElementFlags::EMOTE_IMAGES`].
    pub fn emote(images: EmoteImages, flags: ElementFlags) -> Self {
        let tooltip = images.x1.tooltip.clone();
        let fallback = Box::new(ContentElement::text(
            images.name(),
            ElementFlags::MISC,
            FontStyle::Medium,
        ));
        Self::with_kind(flags, ElementKind::Emote(EmoteElement { images, fallback }))
            .with_tooltip(tooltip)
    }

    /// A timestamp formatted with the pass's configured format string.
    pub fn timestamp(time: NaiveTime) -> Self {
        Self::with_kind(
            ElementFlags::TIMESTAMP,
            ElementKind::Timestamp(TimestampElement {
                time,
                cache: Mutex::new(None),
            }),
        )
    }

    /// A timestamp for the current wall-clock time.
    pub fn timestamp_now() -> Self {
        Self::timestamp(Local::now().time())
    }

    /// The moderation toolbar: one icon piece per configured action.
    pub fn moderation() -> Self {
        Self::with_kind(ElementFlags::MODERATOR_TOOLS, ElementKind::Moderation)
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_trailing_space(mut self, value: bool) -> Self {
        self.trailing_space = value;
        self
    }

    pub fn flags(&self) -> ElementFlags {
        self.flags
    }

    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn has_trailing_space(&self) -> bool {
        self.trailing_space
    }

    /// Contributes this element's pieces to a layout pass.
    ///
    /// Contributes nothing when the element's own flags do not intersect
    /// the pass's `flags`.
    pub fn contribute(&self, container: &mut LayoutContainer<'_>, flags: ElementFlags) {
        if !self.flags.intersects(flags) {
            return;
        }

        match &self.kind {
            ElementKind::Text(text) => text.contribute(self, container),
            ElementKind::Image(image) => image.contribute(self, container),
            ElementKind::Emote(emote) => emote.contribute(self, container, flags),
            ElementKind::Timestamp(timestamp) => timestamp.contribute(container, flags),
            ElementKind::Moderation => contribute_moderation(container),
        }
    }
}

// ============================================================================
// Text
// ============================================================================

#[derive(Debug)]
struct TextElement {
    words: Vec<String>,
    style: FontStyle,
}

impl TextElement {
    fn new(text: &str, style: FontStyle) -> Self {
        Self {
            words: text
                .split(' ')
                .filter(|word| !word.is_empty())
                .map(str::to_string)
                .collect(),
            style,
        }
    }

    /// Word-wrap: fit on the current line, else break and retry, else
    /// split the word at character granularity.
    fn contribute(&self, owner: &ContentElement, container: &mut LayoutContainer<'_>) {
        let metrics = container.metrics();
        let scale = container.scale();
        let line_height = metrics.line_height(self.style, scale);

        let piece = |text: String, width: f32, trailing: bool| {
            LayoutPiece::text(text, self.style, width, line_height)
                .with_link(owner.link.clone())
                .with_tooltip(owner.tooltip.clone())
                .with_trailing_space(trailing)
        };

        for word in &self.words {
            // Always re-measure: font and scale may differ between passes.
            let word_width = metrics.text_width(word, self.style, scale);

            if container.fits_in_line(word_width) {
                container.add_element_no_line_break(piece(
                    word.clone(),
                    word_width,
                    owner.trailing_space,
                ));
                continue;
            }

            if !container.at_start_of_line() {
                container.break_line();

                if container.fits_in_line(word_width) {
                    container.add_element_no_line_break(piece(
                        word.clone(),
                        word_width,
                        owner.trailing_space,
                    ));
                    continue;
                }
            }

            // Wider than a whole line: emit runs of characters, breaking
            // whenever the next character would overflow. A character
            // wider than the line itself still gets placed, alone.
            let mut run = String::new();
            let mut run_width = 0.0_f32;

            for ch in word.chars() {
                let char_width = metrics.char_width(ch, self.style, scale);

                if !run.is_empty() && !container.fits_in_line(run_width + char_width) {
                    container.add_element_no_line_break(piece(
                        std::mem::take(&mut run),
                        run_width,
                        false,
                    ));
                    container.break_line();
                    run_width = 0.0;
                }

                run.push(ch);
                run_width += char_width;
            }

            container.add_element(piece(run, run_width, owner.trailing_space));
            container.break_line();
        }
    }
}

// ============================================================================
// Image
// ============================================================================

#[derive(Debug)]
struct ImageElement {
    image: Arc<Bitmap>,
}

impl ImageElement {
    fn contribute(&self, owner: &ContentElement, container: &mut LayoutContainer<'_>) {
        let scale = container.scale();
        container.add_element(
            LayoutPiece::image(
                Arc::clone(&self.image),
                self.image.scaled_width() * scale,
                self.image.scaled_height() * scale,
            )
            .with_link(owner.link.clone())
            .with_tooltip(owner.tooltip.clone())
            .with_trailing_space(owner.trailing_space),
        );
    }
}

// ============================================================================
// Emote
// ============================================================================

#[derive(Debug)]
struct EmoteElement {
    images: EmoteImages,
    /// Contributed instead of the image when the pass excludes
    /// [`ElementFlags::EMOTE_IMAGES`].
    fallback: Box<ContentElement>,
}

impl EmoteElement {
    fn contribute(
        &self,
        owner: &ContentElement,
        container: &mut LayoutContainer<'_>,
        flags: ElementFlags,
    ) {
        if flags.contains(ElementFlags::EMOTE_IMAGES) {
            let image = self.images.select(container.settings().emote_quality);
            let scale = container.scale();
            container.add_element(
                LayoutPiece::image(
                    Arc::clone(image),
                    image.scaled_width() * scale,
                    image.scaled_height() * scale,
                )
                .with_link(owner.link.clone())
                .with_tooltip(owner.tooltip.clone())
                .with_trailing_space(owner.trailing_space),
            );
        } else {
            self.fallback.contribute(container, self.fallback.flags);
        }
    }
}

// ============================================================================
// Timestamp
// ============================================================================

#[derive(Debug)]
struct TimestampElement {
    time: NaiveTime,
    /// Formatted text, keyed by the format string it was rendered with.
    /// Rebuilt lazily when the configured format changes.
    cache: Mutex<Option<TimestampCache>>,
}

#[derive(Debug)]
struct TimestampCache {
    format: String,
    text: Box<ContentElement>,
}

impl TimestampElement {
    fn contribute(&self, container: &mut LayoutContainer<'_>, flags: ElementFlags) {
        let format = &container.settings().timestamp_format;

        let mut cache = self.cache.lock().unwrap();
        let current = cache.as_ref().is_some_and(|entry| entry.format == *format);
        if !current {
            *cache = Some(TimestampCache {
                format: format.clone(),
                text: Box::new(ContentElement::text(
                    &format_time(self.time, format),
                    ElementFlags::TIMESTAMP,
                    FontStyle::Medium,
                )),
            });
        }

        if let Some(entry) = cache.as_ref() {
            entry.text.contribute(container, flags);
        }
    }
}

fn format_time(time: NaiveTime, format: &str) -> String {
    if crate::layout::is_valid_timestamp_format(format) {
        time.format(format).to_string()
    } else {
        warn!("invalid timestamp format {format:?}, using {DEFAULT_TIMESTAMP_FORMAT:?}");
        time.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
    }
}

// ============================================================================
// Moderation
// ============================================================================

fn contribute_moderation(container: &mut LayoutContainer<'_>) {
    let settings = container.settings();
    let size = MODERATION_ICON_SIZE * container.scale();

    for action in &settings.moderation_actions {
        let piece = match action {
            crate::layout::ModerationAction::Image { image, action } => {
                LayoutPiece::image(Arc::clone(image), size, size)
                    .with_link(Some(Link::UserAction(action.clone())))
            }
            crate::layout::ModerationAction::Label {
                line1,
                line2,
                action,
            } => LayoutPiece::text_icon(line1.clone(), line2.clone(), size)
                .with_link(Some(Link::UserAction(action.clone()))),
        };
        container.add_element(piece);
    }
}
