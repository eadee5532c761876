//! Shared test utilities for the caption-overlay test suite.
//!
//! Provides canvas and photo fixtures plus lookups over batch reports.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let photo = write_photo(tmp.path(), "dawn.png", 40);
//!
//! let report = run_batch(...);
//! let job = find_job(&report, &photo);
//! assert_eq!(job.verdict, Some(BrightnessVerdict::Dark));
//! ```

use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};

use crate::process::{BatchReport, JobReport};

/// Canvas width of the stock configuration.
pub const CANVAS_WIDTH: u32 = 360;
/// Canvas height of the stock configuration.
pub const CANVAS_HEIGHT: u32 = 740;

// =========================================================================
// Image fixtures
// =========================================================================

/// A stock-sized canvas filled with gray `luma`.
pub fn uniform_canvas(luma: u8) -> RgbImage {
    RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgb([luma, luma, luma]))
}

/// A `width` × `height` source photo filled with gray `luma`.
pub fn uniform_source(width: u32, height: u32, luma: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([luma, luma, luma])))
}

/// Write a small gray PNG named `name` into `dir` and return its path.
pub fn write_photo(dir: &Path, name: &str, luma: u8) -> PathBuf {
    let path = dir.join(name);
    uniform_source(64, 128, luma)
        .save(&path)
        .unwrap_or_else(|e| panic!("failed to write fixture {}: {e}", path.display()));
    path
}

// =========================================================================
// Report lookups: panics with a clear message on miss
// =========================================================================

/// Find the report for `source`. Panics if not found.
pub fn find_job<'a>(report: &'a BatchReport, source: &Path) -> &'a JobReport {
    report
        .jobs
        .iter()
        .find(|j| j.source == source)
        .unwrap_or_else(|| {
            let sources: Vec<_> = report.jobs.iter().map(|j| j.source.display()).collect();
            panic!(
                "job for '{}' not found. Available: {sources:?}",
                source.display()
            )
        })
}
