//! Laid-out visual units.
//!
//! A [`LayoutPiece`] is the immutable output record of a layout pass: one
//! placed rectangle plus the payload a renderer needs to paint it and the
//! metadata an interaction layer needs to dispatch clicks. Pieces are
//! produced fresh on every pass and carry their content by value, so they
//! do not borrow from the message they came from.

use std::sync::Arc;

use crate::layout::metrics::FontStyle;
use crate::message::element::{Bitmap, Link};

/// Axis-aligned rectangle in message-local pixels.
///
/// `x` is measured from the line's left margin, `y` from the top of the
/// line the piece landed on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    /// A rectangle of the given size, positioned later by the container.
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
}

/// What a piece paints.
#[derive(Clone, Debug, PartialEq)]
pub enum PieceContent {
    Text {
        text: String,
        style: FontStyle,
    },
    Image {
        image: Arc<Bitmap>,
    },
    /// Two stacked label lines inside an icon-sized box (moderation
    /// buttons without an image).
    TextIcon {
        line1: String,
        line2: String,
    },
}

/// One placed, sized visual unit.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPiece {
    pub content: PieceContent,
    pub rect: Rectangle,
    /// Index of the line this piece landed on, starting at 0.
    pub line: usize,
    pub link: Option<Link>,
    pub tooltip: Option<String>,
    pub trailing_space: bool,
}

impl LayoutPiece {
    fn new(content: PieceContent, width: f32, height: f32) -> Self {
        Self {
            content,
            rect: Rectangle::sized(width, height),
            line: 0,
            link: None,
            tooltip: None,
            trailing_space: false,
        }
    }

    pub fn text(text: impl Into<String>, style: FontStyle, width: f32, height: f32) -> Self {
        Self::new(
            PieceContent::Text {
                text: text.into(),
                style,
            },
            width,
            height,
        )
    }

    pub fn image(image: Arc<Bitmap>, width: f32, height: f32) -> Self {
        Self::new(PieceContent::Image { image }, width, height)
    }

    pub fn text_icon(line1: impl Into<String>, line2: impl Into<String>, size: f32) -> Self {
        Self::new(
            PieceContent::TextIcon {
                line1: line1.into(),
                line2: line2.into(),
            },
            size,
            size,
        )
    }

    pub fn with_link(mut self, link: Option<Link>) -> Self {
        self.link = link;
        self
    }

    pub fn with_tooltip(mut self, tooltip: Option<String>) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn with_trailing_space(mut self, value: bool) -> Self {
        self.trailing_space = value;
        self
    }

    /// The visible text of this piece, if it is a text piece.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            PieceContent::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}
