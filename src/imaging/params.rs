//! Value types shared by the measuring, fitting and painting stages.
//!
//! These structs describe *what* to lay out, not *how* to rasterize it. They
//! are the interface between the [`layout`](crate::layout) module (which
//! decides sizes and positions) and the [`backend`](super::backend) (which
//! does the glyph work). Keeping them plain values lets the fit solver try
//! many sizes without touching any loaded typeface.
//!
//! ## Types
//!
//! - [`Font`]: a style name plus a pixel size. Immutable; shrink with [`Font::with_size`].
//! - [`Region`]: an axis-aligned rectangle on the canvas.
//! - [`Palette`]: the fixed caption colors (band, band text, accents).

use image::Rgb;
use std::fmt;
use std::sync::Arc;

/// A typeface style at a given size.
///
/// The style name (`"bold"`, `"black"`, ...) is resolved by the text backend;
/// the size is an em size in pixels. Cloning is cheap: the style name is
/// shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    style: Arc<str>,
    size: u32,
}

impl Font {
    pub fn new(style: &str, size: u32) -> Self {
        Self {
            style: Arc::from(style),
            size,
        }
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// The same style at another size. The receiver is left untouched.
    pub fn with_size(&self, size: u32) -> Self {
        Self {
            style: Arc::clone(&self.style),
            size,
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.style, self.size)
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// First row below the region.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(i32::try_from(self.height).unwrap_or(i32::MAX))
    }

    /// The part of the region inside a `width` × `height` canvas, if any.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Region> {
        let left = i64::from(self.x).max(0);
        let top = i64::from(self.y).max(0);
        let right = (i64::from(self.x) + i64::from(self.width)).min(i64::from(width));
        let bottom = (i64::from(self.y) + i64::from(self.height)).min(i64::from(height));
        if right <= left || bottom <= top {
            return None;
        }
        Some(Region::new(
            left as i32,
            top as i32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Caption colors.
///
/// Band colors are fixed; accents are picked per brightness verdict.
pub struct Palette;

impl Palette {
    pub const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
    pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    /// Fill behind title text.
    pub const BAND: Rgb<u8> = Self::YELLOW;
    /// Text painted on the band.
    pub const BAND_TEXT: Rgb<u8> = Self::BLACK;
}
