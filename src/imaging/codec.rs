//! Decoding source photos and encoding finished cards.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` (pure Rust decoders) |
//! | Resize to canvas | `image::imageops::resize` with `CatmullRom` (bicubic) |
//! | Encode | `image::RgbImage::save_with_format`, format from the extension |

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: String, message: String },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Extensions whose codecs are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Whether `path` looks like a decodable photo.
pub fn is_supported_input(path: &Path) -> bool {
    let ext = extension_of(path);
    supported_input_extensions().contains(&ext.as_str())
}

/// Load and decode an image from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage, CodecError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| CodecError::Decode {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

/// Stretch `source` to exactly `width`×`height` RGB pixels.
pub fn resize_to_canvas(source: &DynamicImage, width: u32, height: u32) -> RgbImage {
    image::imageops::resize(&source.to_rgb8(), width, height, FilterType::CatmullRom)
}

/// Encode a finished canvas, picking the format from the file extension.
pub fn save_canvas(canvas: &RgbImage, path: &Path) -> Result<(), CodecError> {
    let ext = extension_of(path);
    let format = PHOTO_CANDIDATES
        .iter()
        .find(|(candidate, fmt)| *candidate == ext && fmt.writing_enabled())
        .map(|(_, fmt)| *fmt)
        .ok_or_else(|| CodecError::UnsupportedFormat(ext.clone()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    canvas
        .save_with_format(path, format)
        .map_err(|e| CodecError::Encode {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}
