//! Font file resolution and loading.
//!
//! Styles are looked up in `[fonts.styles]` and read from `[fonts] dir`. No
//! system font discovery happens here: a style is either configured and
//! loadable, or the run fails before any image is touched.

use crate::config::FontsConfig;
use crate::imaging::{BackendError, GlyphBackend};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Style '{0}' is not listed in [fonts.styles]")]
    UnknownStyle(String),
    #[error("Failed to read font file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse font file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: BackendError,
    },
}

/// Full path of the file backing `style`.
pub fn font_path(fonts: &FontsConfig, style: &str) -> Result<PathBuf, FontError> {
    fonts
        .styles
        .get(style)
        .map(|file| fonts.dir.join(file))
        .ok_or_else(|| FontError::UnknownStyle(style.to_string()))
}

/// Read and parse the files for `styles` into a ready-to-share backend.
///
/// Duplicate style names are loaded once.
pub fn load_backend(fonts: &FontsConfig, styles: &[&str]) -> Result<GlyphBackend, FontError> {
    let mut backend = GlyphBackend::new();
    for &style in styles {
        if backend.styles().contains(&style) {
            continue;
        }
        let path = font_path(fonts, style)?;
        let data = std::fs::read(&path).map_err(|source| FontError::Read {
            path: path.clone(),
            source,
        })?;
        backend
            .insert(style, data)
            .map_err(|source| FontError::Parse {
                path: path.clone(),
                source,
            })?;
        debug!(style, path = %path.display(), "loaded font");
    }
    Ok(backend)
}
