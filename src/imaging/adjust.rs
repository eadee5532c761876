//! Canvas adjustments applied before captions are painted.
//!
//! - **Contrast**: blends every channel away from (factor > 1) or towards
//!   (factor < 1) the image's mean gray, so a factor of 1 is a no-op.
//! - **Detail**: 3×3 sharpening kernel, brings edges forward on very dark or
//!   very light photos.
//! - **Smooth-more**: 5×5 low-pass kernel, calms busy mid-light photos so
//!   thin strokes stay readable.
//!
//! Kernels run through `imageproc::filter::Kernel`, which pads edges by
//! continuity, so the canvas keeps its dimensions.

use super::brightness::mean_luma;
use image::RgbImage;
use imageproc::filter::Kernel;

#[rustfmt::skip]
const DETAIL: [f32; 9] = [
     0.0, -1.0,  0.0,
    -1.0, 10.0, -1.0,
     0.0, -1.0,  0.0,
];
const DETAIL_SCALE: f32 = 6.0;

#[rustfmt::skip]
const SMOOTH_MORE: [f32; 25] = [
    1.0, 1.0,  1.0, 1.0, 1.0,
    1.0, 5.0,  5.0, 5.0, 1.0,
    1.0, 5.0, 44.0, 5.0, 1.0,
    1.0, 5.0,  5.0, 5.0, 1.0,
    1.0, 1.0,  1.0, 1.0, 1.0,
];
const SMOOTH_MORE_SCALE: f32 = 100.0;

/// Convolution pass applied after any contrast change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Detail,
    SmoothMore,
}

/// What to do to a canvas before painting text on it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Adjustment {
    pub contrast: Option<f32>,
    pub filter: Option<Filter>,
}

impl Adjustment {
    /// Apply contrast, then the filter, in place.
    pub fn apply(&self, canvas: &mut RgbImage) {
        if let Some(factor) = self.contrast {
            adjust_contrast(canvas, factor);
        }
        match self.filter {
            Some(Filter::Detail) => *canvas = filter(canvas, &DETAIL, 3, DETAIL_SCALE),
            Some(Filter::SmoothMore) => {
                *canvas = filter(canvas, &SMOOTH_MORE, 5, SMOOTH_MORE_SCALE)
            }
            None => {}
        }
    }
}

/// Scale each channel's distance from the rounded mean gray by `factor`.
pub fn adjust_contrast(canvas: &mut RgbImage, factor: f32) {
    let mean = (mean_luma(canvas) + 0.5).floor() as f32;
    for pixel in canvas.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let value = mean + factor * (*channel as f32 - mean);
            *channel = value.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Square-kernel filter; each sum is divided by `scale` and rounded.
fn filter(source: &RgbImage, kernel: &[f32], size: u32, scale: f32) -> RgbImage {
    Kernel::new(kernel, size, size).filter(source, |channel: &mut u8, acc: f32| {
        *channel = (acc / scale).round().clamp(0.0, 255.0) as u8;
    })
}
