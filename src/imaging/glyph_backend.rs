//! Outline-font text backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Parse TTF/OTF | `ab_glyph::FontArc::try_from_vec` |
//! | Advance + kerning | `ab_glyph::ScaleFont::{h_advance, kern}` |
//! | Reference line height | outline bounds of `"hg"` via `Font::outline_glyph` |
//! | Paint | `imageproc::drawing::draw_text_mut` |
//!
//! Sizes are em sizes in pixels: a 35px font has a 35px em square, so the
//! `PxScale` handed to `ab_glyph` (which is ascent-to-descent height) is
//! derived from the face's own `height / units_per_em` ratio.

use super::backend::{BackendError, TextBackend};
use super::params::Font;
use ab_glyph::{Font as _, FontArc, GlyphId, PxScale, ScaleFont, point};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::collections::HashMap;

/// Glyphs used to derive a paragraph-wide line height.
const LINE_HEIGHT_REFERENCE: &str = "hg";

/// Text backend over loaded `ab_glyph` faces, keyed by style name.
///
/// Faces are reference-counted and immutable once inserted, so one backend
/// can serve every render of a batch concurrently.
#[derive(Default, Clone)]
pub struct GlyphBackend {
    faces: HashMap<String, FontArc>,
}

impl GlyphBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `data` as a font and register it under `style`.
    pub fn insert(&mut self, style: &str, data: Vec<u8>) -> Result<(), BackendError> {
        let face =
            FontArc::try_from_vec(data).map_err(|_| BackendError::InvalidFont(style.to_string()))?;
        self.faces.insert(style.to_string(), face);
        Ok(())
    }

    /// Registered style names, sorted.
    pub fn styles(&self) -> Vec<&str> {
        let mut styles: Vec<&str> = self.faces.keys().map(String::as_str).collect();
        styles.sort_unstable();
        styles
    }

    fn face(&self, font: &Font) -> Result<&FontArc, BackendError> {
        self.faces
            .get(font.style())
            .ok_or_else(|| BackendError::UnknownStyle(font.style().to_string()))
    }
}

/// Convert an em size in pixels to the `PxScale` `ab_glyph` expects.
fn px_scale(face: &FontArc, size: u32) -> PxScale {
    let size = size as f32;
    match face.units_per_em() {
        Some(units) if units > 0.0 => PxScale::from(size * face.height_unscaled() / units),
        _ => PxScale::from(size),
    }
}

fn advance_width(face: &FontArc, scale: PxScale, text: &str) -> f32 {
    let scaled = face.as_scaled(scale);
    let mut width = 0.0;
    let mut previous: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Distance from the ascent line to the lowest inked pixel of the reference
/// glyphs. Falls back to ascent minus descent for faces without outlines.
fn reference_height(face: &FontArc, scale: PxScale) -> u32 {
    let scaled = face.as_scaled(scale);
    let ascent = scaled.ascent();
    let mut cursor = 0.0;
    let mut bottom: Option<f32> = None;
    for ch in LINE_HEIGHT_REFERENCE.chars() {
        let id = scaled.glyph_id(ch);
        let glyph = id.with_scale_and_position(scale, point(cursor, ascent));
        if let Some(outlined) = face.outline_glyph(glyph) {
            let max_y = outlined.px_bounds().max.y;
            bottom = Some(bottom.map_or(max_y, |b: f32| b.max(max_y)));
        }
        cursor += scaled.h_advance(id);
    }
    let height = bottom.unwrap_or(ascent - scaled.descent());
    height.ceil().max(1.0) as u32
}

impl TextBackend for GlyphBackend {
    fn has_style(&self, style: &str) -> bool {
        self.faces.contains_key(style)
    }

    fn text_width(&self, font: &Font, text: &str) -> Result<f32, BackendError> {
        let face = self.face(font)?;
        Ok(advance_width(face, px_scale(face, font.size()), text))
    }

    fn line_height(&self, font: &Font) -> Result<u32, BackendError> {
        let face = self.face(font)?;
        Ok(reference_height(face, px_scale(face, font.size())))
    }

    fn draw_text(
        &self,
        canvas: &mut RgbImage,
        font: &Font,
        origin: (i32, i32),
        color: Rgb<u8>,
        text: &str,
    ) -> Result<(), BackendError> {
        let face = self.face(font)?;
        let scale = px_scale(face, font.size());
        draw_text_mut(canvas, color, origin.0, origin.1, scale, face, text);
        Ok(())
    }
}
