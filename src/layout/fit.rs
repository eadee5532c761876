//! Shrink-to-fit font sizing.
//!
//! Starting from the requested size, the text is wrapped and measured; while
//! the block is taller than the box the size drops by one pixel and the text
//! is wrapped again. The first size that fits wins, so the scan never looks
//! above the starting size and never bisects.
//!
//! The scan stops at the floor size. If the block still does not fit there,
//! the floor-size layout is returned with [`FitResult::overflow`] set; callers
//! decide whether to paint it anyway.

use super::calculations::block_height;
use super::wrap::wrap_text;
use super::{LayoutError, TextBlock};
use crate::imaging::{Font, TextBackend};
use tracing::debug;

/// Outcome of a fit: the block to paint and whether it overflows the box.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub block: TextBlock,
    /// Block is taller than the box even at the floor size.
    pub overflow: bool,
    /// Wrap-and-measure passes performed, at most `start − floor + 1`.
    pub iterations: u32,
}

/// Wrap and measure `text` at `font`'s size.
fn layout_at(
    backend: &impl TextBackend,
    text: &str,
    font: Font,
    max_width: u32,
    padding: u32,
) -> Result<TextBlock, LayoutError> {
    let lines = wrap_text(backend, text, &font, max_width as f32)?;
    let line_height = backend.line_height(&font)?;
    let total_height = block_height(lines.len(), line_height, padding);
    Ok(TextBlock {
        lines,
        font,
        line_height,
        total_height,
    })
}

/// Find the largest size, scanning down from `start`, whose wrapped block fits
/// `max_width` × `max_height`.
///
/// Fails with [`LayoutError::InvalidInput`] before measuring anything when
/// the text is blank or either box dimension is zero.
pub fn fit_text(
    backend: &impl TextBackend,
    text: &str,
    start: &Font,
    bounds: (u32, u32),
    padding: u32,
    min_font_size: u32,
) -> Result<FitResult, LayoutError> {
    let (max_width, max_height) = bounds;
    if text.trim().is_empty() {
        return Err(LayoutError::InvalidInput("caption text is empty".into()));
    }
    if max_width == 0 || max_height == 0 {
        return Err(LayoutError::InvalidInput(format!(
            "bounding box must be non-empty, got {max_width}x{max_height}"
        )));
    }

    let mut iterations = 1;
    let mut block = layout_at(backend, text, start.clone(), max_width, padding)?;
    while block.total_height > max_height && block.font.size() > min_font_size {
        let smaller = block.font.with_size(block.font.size() - 1);
        block = layout_at(backend, text, smaller, max_width, padding)?;
        iterations += 1;
    }

    let overflow = block.total_height > max_height;
    debug!(
        font = %block.font,
        lines = block.lines.len(),
        height = block.total_height,
        overflow,
        "fitted caption"
    );
    Ok(FitResult {
        block,
        overflow,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;

    const TITLE: &str = "Top 5 mountains in the world";

    fn fit(text: &str, size: u32, bounds: (u32, u32)) -> FitResult {
        fit_text(
            &MockBackend::new(),
            text,
            &Font::new("bold", size),
            bounds,
            5,
            10,
        )
        .unwrap()
    }

    #[test]
    fn fits_at_starting_size_when_room() {
        let result = fit(TITLE, 35, (340, 360));

        assert_eq!(result.block.font.size(), 35);
        assert_eq!(result.iterations, 1);
        assert!(!result.overflow);
        // 17.5px per char: "Top 5 mountains in" = 315px, adding "the" = 385px
        assert_eq!(result.block.lines, vec!["Top 5 mountains in", "the world"]);
        assert_eq!(result.block.line_height, 42);
        assert_eq!(result.block.total_height, 2 * 47 - 5);
    }

    #[test]
    fn shrinks_until_block_fits() {
        // At 35 the title takes 89px; a 60px box forces a smaller size.
        let result = fit(TITLE, 35, (340, 60));

        assert!(!result.overflow);
        assert!(result.block.font.size() < 35);
        assert!(result.block.total_height <= 60);
        assert_eq!(result.iterations, 35 - result.block.font.size() + 1);
    }

    #[test]
    fn first_fitting_size_is_largest_below_start() {
        let result = fit(TITLE, 35, (340, 60));
        let one_larger = fit(TITLE, result.block.font.size() + 1, (340, 10_000));
        assert!(one_larger.block.total_height > 60);
    }

    #[test]
    fn overflow_at_floor_returns_last_layout() {
        let result = fit(TITLE, 35, (340, 5));

        assert!(result.overflow);
        assert_eq!(result.block.font.size(), 10);
        assert_eq!(result.iterations, 35 - 10 + 1);
        assert!(!result.block.lines.is_empty());
    }

    #[test]
    fn start_below_floor_runs_once() {
        let result = fit(TITLE, 8, (340, 5));
        assert_eq!(result.iterations, 1);
        assert_eq!(result.block.font.size(), 8);
        assert!(result.overflow);
    }

    #[test]
    fn starting_font_is_not_mutated() {
        let start = Font::new("bold", 35);
        let result = fit_text(&MockBackend::new(), TITLE, &start, (340, 60), 5, 10).unwrap();
        assert_eq!(start.size(), 35);
        assert_ne!(result.block.font.size(), 35);
    }

    #[test]
    fn blank_text_rejected_before_measuring() {
        let backend = MockBackend::with_styles(&[]);
        let result = fit_text(&backend, "   ", &Font::new("bold", 35), (340, 360), 5, 10);
        assert!(matches!(result, Err(LayoutError::InvalidInput(_))));
    }

    #[test]
    fn zero_box_rejected() {
        for bounds in [(0, 360), (340, 0)] {
            let result = fit_text(
                &MockBackend::new(),
                TITLE,
                &Font::new("bold", 35),
                bounds,
                5,
                10,
            );
            assert!(matches!(result, Err(LayoutError::InvalidInput(_))), "{bounds:?}");
        }
    }
}
