//! Font measurement injected into layout passes.
//!
//! The engine never touches a real font library; whoever drives a pass
//! supplies a [`FontMetrics`] implementation backed by their rendering
//! surface. Implementations must be safe for concurrent read because
//! passes for different messages may run on different threads.

use unicode_width::UnicodeWidthStr;

/// Font style a text run is measured (and later painted) with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Small,
    Medium,
    MediumBold,
}

/// Measurement service for one font family across styles and scales.
pub trait FontMetrics: Sync {
    /// Pixel width of `text` rendered in `style` at `scale`.
    fn text_width(&self, text: &str, style: FontStyle, scale: f32) -> f32;

    /// Pixel width of a single character.
    ///
    /// Defaults to measuring the character as a one-character string,
    /// which is exact for metrics without kerning context.
    fn char_width(&self, ch: char, style: FontStyle, scale: f32) -> f32 {
        let mut buf = [0u8; 4];
        self.text_width(ch.encode_utf8(&mut buf), style, scale)
    }

    /// Line height for `style` at `scale`.
    fn line_height(&self, style: FontStyle, scale: f32) -> f32;
}

/// Fixed-advance metrics: every terminal cell advances by the same amount,
/// with double-width characters counting as two cells.
///
/// Stands in for a real font service in the CLI and in tests.
pub struct FixedAdvance {
    /// Horizontal advance of one cell at scale 1.0.
    pub advance: f32,
    /// Line height at scale 1.0.
    pub line: f32,
}

impl FixedAdvance {
    pub fn new(advance: f32, line: f32) -> Self {
        Self { advance, line }
    }
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self::new(8.0, 16.0)
    }
}

impl FontMetrics for FixedAdvance {
    fn text_width(&self, text: &str, _style: FontStyle, scale: f32) -> f32 {
        text.width() as f32 * self.advance * scale
    }

    fn line_height(&self, _style: FontStyle, scale: f32) -> f32 {
        self.line * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_advance_scales_by_cell_count() {
        let metrics = FixedAdvance::new(8.0, 16.0);
        assert_eq!(metrics.text_width("hello", FontStyle::Medium, 1.0), 40.0);
        assert_eq!(metrics.text_width("hello", FontStyle::Medium, 2.0), 80.0);
        assert_eq!(metrics.line_height(FontStyle::Small, 1.5), 24.0);
    }

    #[test]
    fn test_fixed_advance_wide_characters_take_two_cells() {
        let metrics = FixedAdvance::new(8.0, 16.0);
        // CJK characters are double-width
        assert_eq!(metrics.text_width("漢", FontStyle::Medium, 1.0), 16.0);
        assert_eq!(metrics.char_width('漢', FontStyle::Medium, 1.0), 16.0);
    }

    #[test]
    fn test_default_char_width_matches_text_width() {
        let metrics = FixedAdvance::default();
        assert_eq!(
            metrics.char_width('a', FontStyle::Medium, 1.0),
            metrics.text_width("a", FontStyle::Medium, 1.0)
        );
    }
}
