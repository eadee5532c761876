//! Pixel-level work: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate codecs |
//! | **Resize to canvas** | `image::imageops::resize` (bicubic) |
//! | **Brightness** | mean ITU-R 601 luma |
//! | **Contrast / detail / smooth** | per-pixel blend and small convolution kernels |
//! | **Text** | `ab_glyph` outlines painted with `imageproc` |
//!
//! The module is split into:
//! - **Parameters**: [`Font`], [`Region`], [`Palette`] value types
//! - **Backend**: [`TextBackend`] trait + [`GlyphBackend`]
//! - **Brightness / Adjust**: lighting verdict and the canvas tweak it implies
//! - **Codec**: reading photos and writing finished cards

pub mod adjust;
pub mod backend;
pub mod brightness;
pub mod codec;
pub mod glyph_backend;
mod params;

pub use adjust::{Adjustment, Filter};
pub use backend::{BackendError, TextBackend};
pub use brightness::{BrightnessVerdict, Thresholds, classify};
pub use codec::{CodecError, load_image, resize_to_canvas, save_canvas};
pub use glyph_backend::GlyphBackend;
pub use params::{Font, Palette, Region};
