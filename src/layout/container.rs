//! # LayoutContainer
//!
//! The line-breaking state machine for a single layout pass.
//!
//! One container lays out one message at one target width and scale. The
//! message's elements call back into it in position order, committing
//! pieces and requesting line breaks; the container tracks the horizontal
//! cursor, assigns each piece its rectangle, and accumulates per-line
//! heights. Passes for different messages may run concurrently as long as
//! each owns its own container.
//!
//! Line geometry: a line's height is the tallest piece on it (or the
//! default line height when a line is broken while still empty), and
//! pieces are bottom-aligned within their line, the way mixed text/emote
//! chat lines sit on a shared baseline.

use crate::layout::metrics::{FontMetrics, FontStyle};
use crate::layout::piece::LayoutPiece;
use crate::layout::LayoutSettings;

/// Output of one layout pass: the placed pieces plus line geometry.
///
/// Piece rectangles are line-local (`y` from the top of their line);
/// absolute line tops follow from the prefix sum of `line_heights`.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageLayout {
    pub pieces: Vec<LayoutPiece>,
    pub line_heights: Vec<f32>,
    pub height: f32,
}

impl MessageLayout {
    pub fn line_count(&self) -> usize {
        self.line_heights.len()
    }

    /// Top edge of line `index`, measured from the top of the message.
    pub fn line_top(&self, index: usize) -> f32 {
        self.line_heights[..index].iter().sum()
    }

    pub fn pieces_on_line(&self, line: usize) -> impl Iterator<Item = &LayoutPiece> {
        self.pieces.iter().filter(move |piece| piece.line == line)
    }
}

/// Stateful accumulator for a single layout pass.
pub struct LayoutContainer<'a> {
    metrics: &'a dyn FontMetrics,
    settings: &'a LayoutSettings,
    target_width: f32,
    scale: f32,
    /// Height committed for a line that ends while still empty.
    default_line_height: f32,

    pieces: Vec<LayoutPiece>,
    line_heights: Vec<f32>,
    height: f32,
    line: usize,
    cursor: f32,
    /// Index into `pieces` where the current (unfinished) line begins.
    line_start: usize,
    line_has_content: bool,
}

impl<'a> LayoutContainer<'a> {
    pub fn new(
        target_width: f32,
        scale: f32,
        metrics: &'a dyn FontMetrics,
        settings: &'a LayoutSettings,
    ) -> Self {
        let default_line_height = metrics.line_height(FontStyle::Medium, scale);
        Self {
            metrics,
            settings,
            target_width,
            scale,
            default_line_height,
            pieces: Vec::new(),
            line_heights: Vec::new(),
            height: 0.0,
            line: 0,
            cursor: 0.0,
            line_start: 0,
            line_has_content: false,
        }
    }

    /// Scale multiplier applied uniformly to all measurements this pass.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn target_width(&self) -> f32 {
        self.target_width
    }

    /// The metrics service for this pass. Returned with the pass lifetime
    /// so elements can measure while mutating the container.
    pub fn metrics(&self) -> &'a dyn FontMetrics {
        self.metrics
    }

    /// The settings for this pass, with the pass lifetime (see
    /// [`metrics`](Self::metrics)).
    pub fn settings(&self) -> &'a LayoutSettings {
        self.settings
    }

    /// Whether a piece of `width` fits in the space left on the current
    /// line. An exactly-filling piece fits.
    pub fn fits_in_line(&self, width: f32) -> bool {
        self.cursor + width <= self.target_width
    }

    /// Whether nothing has been placed on the current line yet.
    pub fn at_start_of_line(&self) -> bool {
        !self.line_has_content
    }

    /// Commits a piece, breaking the line first when the piece does not
    /// fit and the line already has content.
    pub fn add_element(&mut self, piece: LayoutPiece) {
        if self.line_has_content && !self.fits_in_line(piece.rect.width) {
            self.break_line();
        }
        self.commit(piece);
    }

    /// Commits a piece at the cursor unconditionally.
    pub fn add_element_no_line_break(&mut self, piece: LayoutPiece) {
        self.commit(piece);
    }

    fn commit(&mut self, mut piece: LayoutPiece) {
        piece.rect.x = self.cursor;
        piece.line = self.line;
        self.cursor += piece.rect.width;
        self.line_has_content = true;
        self.pieces.push(piece);
    }

    /// Finishes the current line: commits its height (tallest piece, or
    /// the default line height if empty), bottom-aligns its pieces, and
    /// moves the cursor to the start of the next line.
    pub fn break_line(&mut self) {
        let line_height = if self.line_start == self.pieces.len() {
            self.default_line_height
        } else {
            self.pieces[self.line_start..]
                .iter()
                .map(|piece| piece.rect.height)
                .fold(0.0_f32, f32::max)
        };

        for piece in &mut self.pieces[self.line_start..] {
            piece.rect.y = line_height - piece.rect.height;
        }

        self.height += line_height;
        self.line_heights.push(line_height);
        self.line += 1;
        self.cursor = 0.0;
        self.line_start = self.pieces.len();
        self.line_has_content = false;
    }

    /// Ends the pass, finalizing the last line if it has content.
    ///
    /// A pass that placed nothing yields an empty layout of zero height.
    pub fn finish(mut self) -> MessageLayout {
        if self.line_has_content {
            self.break_line();
        }
        MessageLayout {
            pieces: self.pieces,
            line_heights: self.line_heights,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::metrics::FixedAdvance;

    fn piece(width: f32, height: f32) -> LayoutPiece {
        LayoutPiece::text("x", FontStyle::Medium, width, height)
    }

    #[test]
    fn test_exact_fit_is_still_a_fit() {
        let metrics = FixedAdvance::default();
        let settings = LayoutSettings::default();
        let mut container = LayoutContainer::new(100.0, 1.0, &metrics, &settings);

        assert!(container.fits_in_line(100.0));
        container.add_element_no_line_break(piece(60.0, 16.0));
        assert!(container.fits_in_line(40.0));
        assert!(!container.fits_in_line(40.1));
    }

    #[test]
    fn test_add_element_breaks_when_full() {
        let metrics = FixedAdvance::default();
        let settings = LayoutSettings::default();
        let mut container = LayoutContainer::new(100.0, 1.0, &metrics, &settings);

        container.add_element(piece(80.0, 16.0));
        container.add_element(piece(30.0, 16.0));
        let layout = container.finish();

        assert_eq!(layout.pieces[0].line, 0);
        assert_eq!(layout.pieces[1].line, 1);
        assert_eq!(layout.pieces[1].rect.x, 0.0);
        assert_eq!(layout.line_count(), 2);
    }

    #[test]
    fn test_add_element_on_empty_line_never_breaks() {
        let metrics = FixedAdvance::default();
        let settings = LayoutSettings::default();
        let mut container = LayoutContainer::new(100.0, 1.0, &metrics, &settings);

        // Wider than the whole line, but placed without a spurious empty
        // line above it.
        container.add_element(piece(250.0, 16.0));
        let layout = container.finish();

        assert_eq!(layout.pieces.len(), 1);
        assert_eq!(layout.pieces[0].line, 0);
        assert_eq!(layout.line_count(), 1);
    }

    #[test]
    fn test_empty_line_break_commits_default_height() {
        let metrics = FixedAdvance::new(8.0, 16.0);
        let settings = LayoutSettings::default();
        let mut container = LayoutContainer::new(100.0, 1.0, &metrics, &settings);

        container.break_line();
        let layout = container.finish();

        assert_eq!(layout.line_heights, vec![16.0]);
        assert_eq!(layout.height, 16.0);
        assert!(layout.pieces.is_empty());
    }

    #[test]
    fn test_line_height_is_tallest_piece_and_bottom_aligns() {
        let metrics = FixedAdvance::default();
        let settings = LayoutSettings::default();
        let mut container = LayoutContainer::new(200.0, 1.0, &metrics, &settings);

        container.add_element_no_line_break(piece(40.0, 16.0));
        container.add_element_no_line_break(piece(28.0, 28.0));
        container.break_line();
        let layout = container.finish();

        assert_eq!(layout.line_heights, vec![28.0]);
        // Text sits on the bottom of the taller emote line.
        assert_eq!(layout.pieces[0].rect.y, 12.0);
        assert_eq!(layout.pieces[1].rect.y, 0.0);
    }

    #[test]
    fn test_finish_commits_pending_line_once() {
        let metrics = FixedAdvance::default();
        let settings = LayoutSettings::default();
        let mut container = LayoutContainer::new(100.0, 1.0, &metrics, &settings);

        container.add_element_no_line_break(piece(10.0, 16.0));
        container.break_line();
        // Nothing pending after the explicit break.
        let layout = container.finish();

        assert_eq!(layout.line_count(), 1);
        assert_eq!(layout.height, 16.0);
    }

    #[test]
    fn test_empty_pass_yields_zero_height() {
        let metrics = FixedAdvance::default();
        let settings = LayoutSettings::default();
        let layout = LayoutContainer::new(100.0, 1.0, &metrics, &settings).finish();

        assert_eq!(layout.height, 0.0);
        assert_eq!(layout.line_count(), 0);
    }

    #[test]
    fn test_scale_passes_through_to_measurements() {
        let metrics = FixedAdvance::new(8.0, 16.0);
        let settings = LayoutSettings::default();
        let container = LayoutContainer::new(100.0, 2.0, &metrics, &settings);

        assert_eq!(container.scale(), 2.0);
        assert_eq!(
            container
                .metrics()
                .line_height(FontStyle::Medium, container.scale()),
            32.0
        );
    }

    #[test]
    fn test_line_top_is_prefix_sum() {
        let layout = MessageLayout {
            pieces: Vec::new(),
            line_heights: vec![16.0, 28.0, 16.0],
            height: 60.0,
        };
        assert_eq!(layout.line_top(0), 0.0);
        assert_eq!(layout.line_top(1), 16.0);
        assert_eq!(layout.line_top(2), 44.0);
    }
}
