//! # Caption Overlay
//!
//! Paints legible, auto-fitted captions onto photos for fixed-size social
//! cards. A photo goes in, a 360×740 card comes out with either a title on a
//! solid band or a description in a color picked to stand out against it.
//!
//! # Architecture: One Straight Pipeline
//!
//! ```text
//! 1. Resize     source photo  →  canvas           (bicubic, aspect not kept)
//! 2. Classify   canvas        →  verdict          (mean luma, four buckets)
//! 3. Adjust     verdict       →  canvas           (contrast / detail / smooth)
//! 4. Fit        caption       →  text block       (wrap, shrink until it fits)
//! 5. Paint      text block    →  canvas           (band + text, or accent text)
//! ```
//!
//! Every step except painting is a pure function of its inputs, so the layout
//! logic is tested against a fixed-advance mock font without touching real
//! font files or pixels.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`overlay`] | The pipeline above: [`overlay::Overlay::render`] and combined cards |
//! | [`layout`] | Word wrapping, shrink-to-fit sizing, placement math and painting |
//! | [`imaging`] | Text backend trait, brightness classifier, adjustments, image codecs |
//! | [`fonts`] | Resolves configured font styles to files and loads them |
//! | [`config`] | `overlay.toml` loading, merging over stock defaults, validation |
//! | [`process`] | Parallel batch rendering from a job file or a directory |
//! | [`output`] | CLI output formatting for renders and batches |
//! | [`logging`] | `tracing` subscriber setup for the binary |
//!
//! # Design Decisions
//!
//! ## Fonts Behind a Trait
//!
//! Measurement and drawing go through [`imaging::TextBackend`]. The production
//! [`imaging::GlyphBackend`] rasterizes TrueType outlines with `ab_glyph` and
//! `imageproc`; tests use a mock whose every glyph is half the font size wide.
//! Font sizes are always derived from the starting font (`Font::with_size`),
//! never mutated in place, so a shared backend can serve many renders at once.
//!
//! ## Overflow Is a Flag, Not an Error
//!
//! When a caption does not fit its box even at the minimum font size, the
//! smallest layout is painted anyway and the outcome says so. Batch jobs keep
//! going and the report counts overflowing cards.
//!
//! ## Titles Ignore the Accent Color
//!
//! Titles always read black on yellow. The photo is still classified and
//! adjusted first, so a title card and a description card of the same photo
//! share the same background treatment.
//!
//! ## Explicit Configuration
//!
//! There is no global font registry or settings object. The binary loads an
//! [`config::OverlayConfig`] and a backend once and passes both to every
//! render.

pub mod config;
pub mod fonts;
pub mod imaging;
pub mod layout;
pub mod logging;
pub mod output;
pub mod overlay;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
