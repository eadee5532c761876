//! Overlay configuration module.
//!
//! Handles loading, validating, and merging `overlay.toml`. Stock defaults
//! are overridden by whatever the user file specifies; everything else keeps
//! its default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! width = 360               # Output card size in pixels
//! height = 740
//!
//! [layout]
//! padding = 5               # Gap between lines, and band padding
//! margin_between_sections = 50  # Gap between title band and description (cards)
//! safe_margin = 10          # Inset from every canvas edge
//! min_font_size = 10        # Floor for shrink-to-fit
//! title_lift = 120          # How far titles sit above the vertical center
//!
//! [brightness]
//! dark_threshold = 85       # Mean luma below this is "dark"
//! light_threshold = 170     # Mean luma above this is "light"
//!
//! [title]
//! style = "bold"
//! size = 35
//!
//! [description]
//! style = "black"
//! size = 40
//!
//! [fonts]
//! dir = "fonts"             # Relative to the config file
//!
//! [fonts.styles]
//! black = "Roboto-Black.ttf"
//! bold = "Roboto-Bold.ttf"
//!
//! [processing]
//! max_processes = 4         # Max parallel batch workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [title]
//! size = 42
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Font, Thresholds};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest canvas side accepted, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Overlay configuration loaded from `overlay.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Output canvas size.
    pub canvas: CanvasConfig,
    /// Spacing and sizing rules for caption layout.
    pub layout: LayoutConfig,
    /// Luma thresholds for the brightness verdict.
    pub brightness: BrightnessConfig,
    /// Starting font for titles.
    pub title: TitleConfig,
    /// Starting font for descriptions.
    pub description: DescriptionConfig,
    /// Where the named font styles live.
    pub fonts: FontsConfig,
    /// Parallel batch settings.
    pub processing: ProcessingConfig,
}

impl OverlayConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let CanvasConfig { width, height } = self.canvas;
        if width == 0 || height == 0 {
            return Err(ConfigError::Validation(
                "canvas width and height must be non-zero".into(),
            ));
        }
        if width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
            return Err(ConfigError::Validation(format!(
                "canvas {width}x{height} exceeds {MAX_CANVAS_SIDE} pixels per side"
            )));
        }
        let safe_margin = self.layout.safe_margin;
        if safe_margin >= width.div_ceil(2) || safe_margin >= height.div_ceil(2) {
            return Err(ConfigError::Validation(format!(
                "layout.safe_margin {safe_margin} leaves no room on a {width}x{height} canvas"
            )));
        }
        for (key, value) in [
            ("padding", self.layout.padding),
            ("margin_between_sections", self.layout.margin_between_sections),
            ("title_lift", self.layout.title_lift),
            ("min_font_size", self.layout.min_font_size),
        ] {
            if value > height {
                return Err(ConfigError::Validation(format!(
                    "layout.{key} {value} is larger than the canvas height {height}"
                )));
            }
        }
        if self.brightness.dark_threshold >= self.brightness.light_threshold {
            return Err(ConfigError::Validation(
                "brightness.dark_threshold must be below brightness.light_threshold".into(),
            ));
        }
        if self.layout.min_font_size == 0 {
            return Err(ConfigError::Validation(
                "layout.min_font_size must be at least 1".into(),
            ));
        }
        if self.title.size == 0 || self.description.size == 0 {
            return Err(ConfigError::Validation(
                "title.size and description.size must be at least 1".into(),
            ));
        }
        if self.title.size > height || self.description.size > height {
            return Err(ConfigError::Validation(format!(
                "title.size and description.size must not exceed the canvas height {height}"
            )));
        }
        for (section, style) in [
            ("title", &self.title.style),
            ("description", &self.description.style),
        ] {
            if !self.fonts.styles.contains_key(style) {
                return Err(ConfigError::Validation(format!(
                    "{section}.style '{style}' has no entry in [fonts.styles]"
                )));
            }
        }
        Ok(())
    }
}

/// Output canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 360,
            height: 740,
        }
    }
}

impl CanvasConfig {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Spacing and sizing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Vertical gap between lines; also the band's inner padding.
    pub padding: u32,
    /// Gap between the title band and the description on combined cards.
    pub margin_between_sections: u32,
    /// Inset from every canvas edge.
    pub safe_margin: u32,
    /// Smallest size the fit solver will try.
    pub min_font_size: u32,
    /// Pixels a title is raised above the vertically centered position.
    pub title_lift: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 5,
            margin_between_sections: 50,
            safe_margin: 10,
            min_font_size: 10,
            title_lift: 120,
        }
    }
}

/// Luma thresholds on the 0–255 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrightnessConfig {
    pub dark_threshold: u8,
    pub light_threshold: u8,
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        Self {
            dark_threshold: 85,
            light_threshold: 170,
        }
    }
}

impl BrightnessConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            dark: self.dark_threshold as f64,
            light: self.light_threshold as f64,
        }
    }
}

/// Starting font for titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TitleConfig {
    pub style: String,
    pub size: u32,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            style: "bold".to_string(),
            size: 35,
        }
    }
}

impl TitleConfig {
    pub fn font(&self) -> Font {
        Font::new(&self.style, self.size)
    }
}

/// Starting font for descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DescriptionConfig {
    pub style: String,
    pub size: u32,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            style: "black".to_string(),
            size: 40,
        }
    }
}

impl DescriptionConfig {
    pub fn font(&self) -> Font {
        Font::new(&self.style, self.size)
    }
}

/// Font files by style name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Directory holding the font files. Relative paths resolve against the
    /// directory of the config file.
    pub dir: PathBuf,
    /// Style name → file name inside `dir`.
    pub styles: BTreeMap<String, String>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        let styles = [
            ("black", "Roboto-Black.ttf"),
            ("bold", "Roboto-Bold.ttf"),
            ("medium", "Roboto-Medium.ttf"),
            ("light", "Roboto-Light.ttf"),
            ("thin", "Roboto-Thin.ttf"),
        ]
        .into_iter()
        .map(|(style, file)| (style.to_string(), file.to_string()))
        .collect();
        Self {
            dir: PathBuf::from("fonts"),
            styles,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(OverlayConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<OverlayConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: OverlayConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when the file is
/// missing.
///
/// A relative `fonts.dir` is rebased onto the config file's directory.
pub fn load_config(path: &Path) -> Result<OverlayConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    let mut config = resolve_config(overlay)?;
    if config.fonts.dir.is_relative() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.fonts.dir = parent.join(&config.fonts.dir);
        }
    }
    Ok(config)
}

/// Returns a fully-commented stock `overlay.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Caption Overlay Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output canvas
# ---------------------------------------------------------------------------
[canvas]
# Every source image is stretched to exactly this size (at most 16384 per side).
width = 360
height = 740

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# Pixel values here may not exceed the canvas height.

# Vertical gap between wrapped lines; also the padding inside title bands.
padding = 5

# Gap between the title band and the description on combined cards.
margin_between_sections = 50

# Inset from every canvas edge.
safe_margin = 10

# Smallest font size tried when shrinking text to fit.
min_font_size = 10

# Pixels a title sits above the vertically centered position.
title_lift = 120

# ---------------------------------------------------------------------------
# Brightness classification (mean luma, 0-255)
# ---------------------------------------------------------------------------
[brightness]
# Below this the image is "dark" (yellow accents, detail pass).
dark_threshold = 85

# Above this the image is "light" (red accents, detail pass).
light_threshold = 170

# ---------------------------------------------------------------------------
# Starting fonts (shrunk as needed to fit)
# ---------------------------------------------------------------------------
[title]
style = "bold"
size = 35

[description]
style = "black"
size = 40

# ---------------------------------------------------------------------------
# Font files
# ---------------------------------------------------------------------------
[fonts]
# Directory holding the font files, relative to this config file.
dir = "fonts"

[fonts.styles]
black = "Roboto-Black.ttf"
bold = "Roboto-Bold.ttf"
light = "Roboto-Light.ttf"
medium = "Roboto-Medium.ttf"
thin = "Roboto-Thin.ttf"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers for batches.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_legacy_constants() {
        let config = OverlayConfig::default();
        assert_eq!(config.canvas.size(), (360, 740));
        assert_eq!(config.layout.padding, 5);
        assert_eq!(config.layout.margin_between_sections, 50);
        assert_eq!(config.layout.safe_margin, 10);
        assert_eq!(config.layout.min_font_size, 10);
        assert_eq!(config.brightness.dark_threshold, 85);
        assert_eq!(config.brightness.light_threshold, 170);
        assert_eq!(config.title.font(), Font::new("bold", 35));
        assert_eq!(config.description.font(), Font::new("black", 40));
    }

    #[test]
    fn default_fonts_cover_five_styles() {
        let config = OverlayConfig::default();
        let styles: Vec<&str> = config.fonts.styles.keys().map(String::as_str).collect();
        assert_eq!(styles, vec!["black", "bold", "light", "medium", "thin"]);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[title]
size = 42
"#;
        let config: OverlayConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.title.size, 42);
        assert_eq!(config.title.style, "bold");
        assert_eq!(config.description.size, 40);
    }

    #[test]
    fn thresholds_convert_to_luma_scale() {
        let thresholds = BrightnessConfig::default().thresholds();
        assert_eq!(thresholds, Thresholds::default());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("overlay.toml")).unwrap();
        assert_eq!(config.canvas, CanvasConfig::default());
        assert_eq!(config.fonts.dir, tmp.path().join("fonts"));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("overlay.toml");
        fs::write(
            &path,
            r#"
[layout]
padding = 8

[brightness]
dark_threshold = 60
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.layout.padding, 8);
        assert_eq!(config.brightness.dark_threshold, 60);
        // Unspecified values should be defaults
        assert_eq!(config.layout.safe_margin, 10);
        assert_eq!(config.brightness.light_threshold, 170);
    }

    #[test]
    fn load_config_keeps_absolute_font_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("overlay.toml");
        fs::write(&path, "[fonts]\ndir = \"/usr/share/fonts/roboto\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.fonts.dir, PathBuf::from("/usr/share/fonts/roboto"));
    }

    #[test]
    fn load_config_adds_styles_without_dropping_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("overlay.toml");
        fs::write(&path, "[fonts.styles]\ncondensed = \"Roboto-Condensed.ttf\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.fonts.styles.contains_key("condensed"));
        assert!(config.fonts.styles.contains_key("bold"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("overlay.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("overlay.toml");
        fs::write(&path, "[layout]\npadingg = 3\n").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<OverlayConfig, _> = toml::from_str("[watermark]\ntext = \"x\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str("[fonts.styles]\nbold = \"a.ttf\"").unwrap();
        let overlay: toml::Value = toml::from_str("[fonts.styles]\nthin = \"b.ttf\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["fonts"]["styles"]["bold"].as_str(), Some("a.ttf"));
        assert_eq!(merged["fonts"]["styles"]["thin"].as_str(), Some("b.ttf"));
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_canvas() {
        let mut config = OverlayConfig::default();
        config.canvas.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_safe_margin_swallows_canvas() {
        let mut config = OverlayConfig::default();
        config.layout.safe_margin = 180;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("safe_margin"));
    }

    #[test]
    fn validate_safe_margin_boundary() {
        // 2 × 179 = 358 leaves a 2px column on the 360px canvas
        let mut config = OverlayConfig::default();
        config.layout.safe_margin = 179;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_huge_safe_margin_is_error_not_overflow() {
        let overlay: toml::Value = toml::from_str("[layout]\nsafe_margin = 3000000000").unwrap();
        let err = resolve_config(Some(overlay)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("safe_margin")));
    }

    #[test]
    fn validate_spacing_bounded_by_canvas_height() {
        for key in ["padding", "margin_between_sections", "title_lift", "min_font_size"] {
            let overlay: toml::Value =
                toml::from_str(&format!("[layout]\n{key} = 4294967290")).unwrap();
            let err = resolve_config(Some(overlay)).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation(ref m) if m.contains(key)),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn validate_spacing_equal_to_canvas_height_allowed() {
        let mut config = OverlayConfig::default();
        config.layout.padding = 740;
        config.layout.title_lift = 740;
        config.layout.margin_between_sections = 740;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_oversized_canvas_and_fonts() {
        let mut config = OverlayConfig::default();
        config.canvas.height = MAX_CANVAS_SIDE + 1;
        assert!(config.validate().is_err());

        let mut config = OverlayConfig::default();
        config.title.size = 741;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_threshold_order() {
        let mut config = OverlayConfig::default();
        config.brightness.dark_threshold = 170;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_font_sizes() {
        let mut config = OverlayConfig::default();
        config.layout.min_font_size = 0;
        assert!(config.validate().is_err());

        let mut config = OverlayConfig::default();
        config.title.size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_style_must_have_font_file() {
        let mut config = OverlayConfig::default();
        config.description.style = "condensed".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("condensed"));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[canvas]\nheight = 0").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Processing / stock config
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_never_zero() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: OverlayConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, OverlayConfig::default());
    }
}
