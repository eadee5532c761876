//! Adaptive caption layout.
//!
//! | Step | Function |
//! |---|---|
//! | **Wrap** | [`wrap_text`]: greedy packing of whitespace tokens |
//! | **Fit** | [`fit_text`]: downward size scan until the block fits |
//! | **Render** | [`render_banded`] / [`render_plain`]: centered painting |
//!
//! The module is split into:
//! - **Calculations**: pure placement arithmetic (unit testable)
//! - **Wrap / Fit**: measuring through a [`TextBackend`](crate::imaging::TextBackend)
//! - **Render**: painting a [`TextBlock`] onto a canvas

mod calculations;
pub mod fit;
pub mod render;
pub mod wrap;

use crate::imaging::{BackendError, Font};
use thiserror::Error;

pub use calculations::{
    band_region, block_height, caption_box, center_offset, description_top, title_top,
};
pub use fit::{FitResult, fit_text};
pub use render::{BandStyle, RenderReport, render_banded, render_plain};
pub use wrap::wrap_text;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Text backend failed: {0}")]
    Backend(#[from] BackendError),
}

/// Wrapped lines plus the font and metrics they were measured with.
///
/// Produced by the fit solver, read by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub font: Font,
    pub line_height: u32,
    pub total_height: u32,
}
