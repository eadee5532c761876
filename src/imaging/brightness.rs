//! Brightness classification of a canvas.
//!
//! The mean luma of the image picks one of four lighting buckets. Each bucket
//! carries a fixed policy: how to adjust the image before painting and which
//! accent color reads best on top of it.
//!
//! ```text
//!   0 ─────── dark ───────┬──── mid-dark ────┬──── mid-light ───┬─────── light ─────── 255
//!                     dark_threshold        128          light_threshold
//! ```
//!
//! Both threshold comparisons are strict: a mean exactly at a threshold falls
//! into the adjacent middle bucket.

use super::adjust::{Adjustment, Filter};
use super::params::Palette;
use image::{Rgb, RgbImage};
use serde::Serialize;

/// Luma value splitting the middle range into mid-dark and mid-light.
const MID_POINT: f64 = 128.0;

/// Lighting bucket of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrightnessVerdict {
    Dark,
    MidDark,
    MidLight,
    Light,
}

impl BrightnessVerdict {
    /// Image adjustment applied before any text is painted.
    pub fn adjustment(self) -> Adjustment {
        match self {
            Self::Dark | Self::Light => Adjustment {
                contrast: None,
                filter: Some(Filter::Detail),
            },
            Self::MidDark => Adjustment {
                contrast: Some(0.75),
                filter: None,
            },
            Self::MidLight => Adjustment {
                contrast: Some(1.2),
                filter: Some(Filter::SmoothMore),
            },
        }
    }

    /// Foreground color for unbanded text.
    pub fn accent(self) -> Rgb<u8> {
        match self {
            Self::Dark | Self::MidDark => Palette::YELLOW,
            Self::MidLight | Self::Light => Palette::RED,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::MidDark => "mid-dark",
            Self::MidLight => "mid-light",
            Self::Light => "light",
        }
    }
}

/// Luma thresholds on the 0–255 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub dark: f64,
    pub light: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            dark: 85.0,
            light: 170.0,
        }
    }
}

/// ITU-R 601 luma in fixed point, same weights as common `L` conversions.
#[inline]
pub fn luma(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    ((19595 * r as u32 + 38470 * g as u32 + 7471 * b as u32 + 0x8000) >> 16) as u8
}

/// Mean luma over every pixel. An empty image has mean 0.
pub fn mean_luma(image: &RgbImage) -> f64 {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let total: u64 = image.pixels().map(|p| luma(p) as u64).sum();
    total as f64 / count as f64
}

/// Bucket a mean luma value.
pub fn classify_mean(mean: f64, thresholds: Thresholds) -> BrightnessVerdict {
    if mean < thresholds.dark {
        BrightnessVerdict::Dark
    } else if mean > thresholds.light {
        BrightnessVerdict::Light
    } else if mean < MID_POINT {
        BrightnessVerdict::MidDark
    } else {
        BrightnessVerdict::MidLight
    }
}

/// Classify an image region by its mean luma.
pub fn classify(image: &RgbImage, thresholds: Thresholds) -> BrightnessVerdict {
    classify_mean(mean_luma(image), thresholds)
}
