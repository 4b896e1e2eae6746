//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::Arc;

use crate::layout::metrics::{FontMetrics, FontStyle};
use crate::message::element::{Bitmap, EmoteImages};

/// Metrics with exact per-string widths and a fixed per-character
/// fallback, so tests can pin the numbers the fitting rules see.
pub struct TableMetrics {
    widths: HashMap<String, f32>,
    char_advance: f32,
    line: f32,
}

impl TableMetrics {
    pub fn new(char_advance: f32, line: f32) -> Self {
        Self {
            widths: HashMap::new(),
            char_advance,
            line,
        }
    }

    pub fn with_word(mut self, word: &str, width: f32) -> Self {
        self.widths.insert(word.to_string(), width);
        self
    }
}

impl FontMetrics for TableMetrics {
    fn text_width(&self, text: &str, _style: FontStyle, scale: f32) -> f32 {
        match self.widths.get(text) {
            Some(width) => width * scale,
            None => text.chars().count() as f32 * self.char_advance * scale,
        }
    }

    fn line_height(&self, _style: FontStyle, scale: f32) -> f32 {
        self.line * scale
    }
}

pub fn bitmap(name: &str, width: f32, height: f32, scale: f32) -> Arc<Bitmap> {
    Arc::new(Bitmap::new(name, width, height, scale))
}

/// An emote with all three tiers resolved, each rendering at the same
/// 28px logical size.
pub fn emote_all_tiers(name: &str) -> EmoteImages {
    EmoteImages {
        x1: bitmap(name, 28.0, 28.0, 1.0),
        x2: Some(bitmap(name, 56.0, 56.0, 0.5)),
        x3: Some(bitmap(name, 112.0, 112.0, 0.25)),
    }
}

/// An emote where only the 1x tier resolved.
pub fn emote_tier1(name: &str) -> EmoteImages {
    EmoteImages {
        x1: bitmap(name, 28.0, 28.0, 1.0),
        x2: None,
        x3: None,
    }
}
