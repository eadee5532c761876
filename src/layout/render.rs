//! Painting fitted text onto a canvas.
//!
//! Two styles:
//!
//! - **Banded** ([`render_banded`]): a solid band behind the block, text in a
//!   fixed contrasting color. Used for titles.
//! - **Plain** ([`render_plain`]): text straight on the photo in an accent
//!   color. Used for descriptions.
//!
//! Every line is centered in its box with [`center_offset`] and lines advance
//! by `line_height + padding`. Blocks that overflowed during fitting are still
//! painted; anything outside the canvas is clipped by the rasterizer.

use super::calculations::{band_region, center_offset};
use super::{LayoutError, TextBlock};
use crate::imaging::{Region, TextBackend};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Band geometry and colors for [`render_banded`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStyle {
    /// Left edge of the band; lines are centered in `x .. x + width`.
    pub x: i32,
    pub width: u32,
    pub fill: Rgb<u8>,
    pub text_color: Rgb<u8>,
}

/// Where things were painted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderReport {
    pub band: Option<Region>,
    /// Top-left origin of each painted line, in block order.
    pub line_origins: Vec<(i32, i32)>,
}

fn paint_lines(
    canvas: &mut RgbImage,
    backend: &impl TextBackend,
    block: &TextBlock,
    anchor: (i32, i32),
    box_width: u32,
    color: Rgb<u8>,
    padding: u32,
) -> Result<Vec<(i32, i32)>, LayoutError> {
    let (anchor_x, mut y) = anchor;
    let advance = i32::try_from(block.line_height.saturating_add(padding)).unwrap_or(i32::MAX);
    let mut origins = Vec::with_capacity(block.lines.len());
    for line in &block.lines {
        let width = backend.text_width(&block.font, line)?;
        let x = center_offset(anchor_x, box_width, width);
        backend.draw_text(canvas, &block.font, (x, y), color, line)?;
        origins.push((x, y));
        y = y.saturating_add(advance);
    }
    Ok(origins)
}

/// Paint `block` on a solid band whose text starts at `text_top`.
///
/// The band spans `style.width` and covers the block plus `padding` above and
/// below.
pub fn render_banded(
    canvas: &mut RgbImage,
    backend: &impl TextBackend,
    block: &TextBlock,
    style: &BandStyle,
    text_top: i32,
    padding: u32,
) -> Result<RenderReport, LayoutError> {
    let band = band_region(style.x, style.width, text_top, block.total_height, padding);
    if let Some(visible) = band.clip_to(canvas.width(), canvas.height()) {
        let rect = Rect::at(visible.x, visible.y).of_size(visible.width, visible.height);
        draw_filled_rect_mut(canvas, rect, style.fill);
    }
    let line_origins = paint_lines(
        canvas,
        backend,
        block,
        (style.x, text_top),
        style.width,
        style.text_color,
        padding,
    )?;
    Ok(RenderReport {
        band: Some(band),
        line_origins,
    })
}

/// Paint `block` directly on the canvas, centered in `box_width` starting at
/// `anchor`.
pub fn render_plain(
    canvas: &mut RgbImage,
    backend: &impl TextBackend,
    block: &TextBlock,
    anchor: (i32, i32),
    box_width: u32,
    color: Rgb<u8>,
    padding: u32,
) -> Result<RenderReport, LayoutError> {
    let line_origins = paint_lines(canvas, backend, block, anchor, box_width, color, padding)?;
    Ok(RenderReport {
        band: None,
        line_origins,
    })
}
