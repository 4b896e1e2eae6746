//! # Message layout engine
//!
//! Converts a message's content elements into a line-wrapped sequence of
//! positioned pieces, independent of any rendering surface.
//!
//! ## Architecture
//!
//! A layout pass is driven by the consumer (typically a rendering layer):
//! it constructs a [`LayoutContainer`] bound to a target width, scale,
//! font metrics, and [`LayoutSettings`], then calls
//! `ContentElement::contribute` for each element of the message in order.
//! The finished container yields a [`MessageLayout`].
//!
//! There is no hidden global state: everything an element could want to
//! look up (emote quality, timestamp format, moderation actions) travels
//! in [`LayoutSettings`], so passes are reproducible and independently
//! testable.

pub mod container;
pub mod metrics;
pub mod piece;

use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};

pub use container::{LayoutContainer, MessageLayout};
pub use metrics::{FixedAdvance, FontMetrics, FontStyle};
pub use piece::{LayoutPiece, PieceContent, Rectangle};

use crate::message::element::Bitmap;

/// Timestamp format used when none is configured (or the configured one
/// is malformed).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M";

/// Whether `format` is a well-formed strftime string chrono can render.
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// One entry of the moderation toolbar rendered next to messages.
///
/// Carries the action payload dispatched when the resulting piece is
/// clicked, e.g. `"ban"` or `"timeout 600"`.
#[derive(Clone, Debug, PartialEq)]
pub enum ModerationAction {
    Image { image: Arc<Bitmap>, action: String },
    Label { line1: String, line2: String, action: String },
}

impl ModerationAction {
    pub fn action(&self) -> &str {
        match self {
            ModerationAction::Image { action, .. } => action,
            ModerationAction::Label { action, .. } => action,
        }
    }
}

/// Per-pass configuration threaded into every layout pass.
#[derive(Clone, Debug)]
pub struct LayoutSettings {
    /// Preferred emote resolution tier, 1..=3. Falls back to the best
    /// available lower tier when the preferred one is absent.
    pub emote_quality: u8,
    /// strftime format string for timestamp elements.
    pub timestamp_format: String,
    /// Ordered moderation actions; one piece is laid out per action.
    pub moderation_actions: Vec<ModerationAction>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            emote_quality: 1,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            moderation_actions: Vec::new(),
        }
    }
}
