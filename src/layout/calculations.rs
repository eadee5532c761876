//! Pure placement arithmetic.
//!
//! All functions here are pure and testable without any fonts or images.

use crate::imaging::Region;

/// Height of a block of `lines` lines separated by `padding`.
///
/// `lines × (line_height + padding) − padding`, saturating at `u32::MAX`; a
/// block of zero lines is 0.
pub fn block_height(lines: usize, line_height: u32, padding: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    u32::try_from(lines)
        .unwrap_or(u32::MAX)
        .saturating_mul(line_height.saturating_add(padding))
        .saturating_sub(padding)
}

/// Clamp a wide intermediate into pixel coordinates.
fn to_coord(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Left edge of a line centered in a box starting at `anchor_x`.
///
/// The half-difference is truncated toward zero, so a line wider than the box
/// starts left of `anchor_x` by the same rounding rule.
///
/// # Examples
/// ```
/// # use caption_overlay::layout::center_offset;
/// assert_eq!(center_offset(10, 340, 300.0), 30);
/// assert_eq!(center_offset(10, 340, 340.0), 10);
/// ```
pub fn center_offset(anchor_x: i32, box_width: u32, line_width: f32) -> i32 {
    anchor_x + ((box_width as f32 - line_width) / 2.0).trunc() as i32
}

/// Box a caption must fit into: full width and half the height of the canvas,
/// both inside the safe margin.
pub fn caption_box(canvas: (u32, u32), safe_margin: u32) -> Region {
    let (width, height) = canvas;
    Region::new(
        to_coord(safe_margin as i64),
        to_coord(safe_margin as i64),
        width.saturating_sub(safe_margin.saturating_mul(2)),
        height.saturating_sub(safe_margin.saturating_mul(2)) / 2,
    )
}

/// Top of the first description line: the block is centered on the canvas
/// height, shifted down by the safe margin.
pub fn description_top(canvas_height: u32, safe_margin: u32, total_height: u32) -> i32 {
    let offset = (canvas_height as i64 - total_height as i64).div_euclid(2);
    to_coord(safe_margin as i64 + offset)
}

/// Top of the first title line: the description position lifted by `lift`,
/// never so high that the band (which starts `padding` above the text) leaves
/// the canvas.
pub fn title_top(
    canvas_height: u32,
    safe_margin: u32,
    total_height: u32,
    lift: u32,
    padding: u32,
) -> i32 {
    let top = description_top(canvas_height, safe_margin, total_height) as i64 - lift as i64;
    to_coord(top.max(padding as i64))
}

/// Band rectangle behind a title whose first line starts at `text_top`.
pub fn band_region(x: i32, width: u32, text_top: i32, total_height: u32, padding: u32) -> Region {
    Region::new(
        x,
        to_coord(text_top as i64 - padding as i64),
        width,
        total_height.saturating_add(padding.saturating_mul(2)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // block_height
    // =========================================================================

    #[test]
    fn block_height_single_line_has_no_padding() {
        assert_eq!(block_height(1, 42, 5), 42);
    }

    #[test]
    fn block_height_counts_gaps_between_lines() {
        assert_eq!(block_height(3, 42, 5), 3 * 47 - 5);
    }

    #[test]
    fn block_height_of_nothing_is_zero() {
        assert_eq!(block_height(0, 42, 5), 0);
    }

    #[test]
    fn block_height_saturates_instead_of_overflowing() {
        assert_eq!(block_height(2, 40, 4_294_967_290), u32::MAX - 4_294_967_290);
        assert_eq!(block_height(usize::MAX, 42, 5), u32::MAX - 5);
    }

    // =========================================================================
    // center_offset
    // =========================================================================

    #[test]
    fn centered_line_splits_slack_evenly() {
        assert_eq!(center_offset(0, 340, 300.0), 20);
    }

    #[test]
    fn full_width_line_sits_on_anchor() {
        assert_eq!(center_offset(0, 340, 340.0), 0);
        assert_eq!(center_offset(10, 340, 340.0), 10);
    }

    #[test]
    fn odd_slack_truncates() {
        // (340 - 301) / 2 = 19.5 → 19
        assert_eq!(center_offset(0, 340, 301.0), 19);
        // fractional measured widths truncate too
        assert_eq!(center_offset(0, 340, 299.4), 20);
    }

    #[test]
    fn overwide_line_truncates_toward_zero() {
        // (340 - 351) / 2 = -5.5 → -5
        assert_eq!(center_offset(10, 340, 351.0), 5);
    }

    // =========================================================================
    // Regions and anchors
    // =========================================================================

    #[test]
    fn caption_box_for_default_canvas() {
        assert_eq!(caption_box((360, 740), 10), Region::new(10, 10, 340, 360));
    }

    #[test]
    fn caption_box_saturates_on_tiny_canvas() {
        let region = caption_box((15, 15), 10);
        assert!(region.is_empty());
    }

    #[test]
    fn description_is_vertically_centered() {
        // 10 + (740 - 89) / 2 = 10 + 325
        assert_eq!(description_top(740, 10, 89), 335);
    }

    #[test]
    fn title_is_lifted_above_description() {
        assert_eq!(title_top(740, 10, 89, 120, 5), 215);
    }

    #[test]
    fn title_lift_never_pushes_band_off_canvas() {
        // A 700px block would start at 10 + 20 - 120 = -90 without the clamp.
        assert_eq!(title_top(740, 10, 700, 120, 5), 5);
    }

    #[test]
    fn band_wraps_text_with_padding() {
        let band = band_region(10, 340, 215, 89, 5);
        assert_eq!(band, Region::new(10, 210, 340, 99));
    }

    #[test]
    fn anchors_stay_in_range_for_extreme_inputs() {
        // 10 + floor((740 - 4294967295) / 2): far above the canvas, not wrapped
        assert_eq!(description_top(740, 10, u32::MAX), -2_147_483_268);
        // Lift beyond i32 range is clamped by the padding floor.
        assert_eq!(title_top(740, 10, 89, u32::MAX, 5), 5);
        // Band height saturates.
        assert_eq!(band_region(10, 340, 5, u32::MAX, 5).height, u32::MAX);
        assert!(caption_box((360, 740), u32::MAX).is_empty());
    }
}
