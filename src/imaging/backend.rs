//! Text backend trait and shared error type.
//!
//! The [`TextBackend`] trait defines what the layout engine needs from a
//! rasterizer: measure a string, report a uniform line height, and paint a
//! line onto the canvas.
//!
//! The production implementation is
//! [`GlyphBackend`](super::glyph_backend::GlyphBackend): `ab_glyph` outlines
//! painted through `imageproc`. Everything else in the crate is written
//! against the trait, so layout and orchestration are testable with a
//! fixed-advance mock.

use super::params::Font;
use image::{Rgb, RgbImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid font data for style '{0}'")]
    InvalidFont(String),
    #[error("No typeface loaded for style '{0}'")]
    UnknownStyle(String),
}

/// Trait for text measuring and painting backends.
///
/// Implementations hold already-loaded typefaces keyed by style name and are
/// shared read-only across threads during batch renders, hence `Sync`.
/// Measurements must be deterministic for a given font and string.
pub trait TextBackend: Sync {
    /// Whether a typeface is loaded for `style`.
    fn has_style(&self, style: &str) -> bool;

    /// Rendered width of `text` in pixels.
    fn text_width(&self, font: &Font, text: &str) -> Result<f32, BackendError>;

    /// Line height in pixels, taken from the reference pair `"hg"` so every
    /// line in a paragraph gets the same spacing.
    fn line_height(&self, font: &Font) -> Result<u32, BackendError>;

    /// Paint `text` with its top-left corner at `origin`.
    fn draw_text(
        &self,
        canvas: &mut RgbImage,
        font: &Font,
        origin: (i32, i32),
        color: Rgb<u8>,
        text: &str,
    ) -> Result<(), BackendError>;
}
