//! Caption overlay orchestration.
//!
//! One render is a straight pipeline with no suspension points:
//!
//! ```text
//! source ─ resize ─ classify ─ adjust ─ fit ─ paint ─▶ canvas
//!                      │                         ▲
//!                      └── accent color ─────────┘  (descriptions only)
//! ```
//!
//! Titles always get black text on a yellow band, whatever the verdict; the
//! verdict still drives the image adjustment. Descriptions have no band and
//! take their color from the verdict.
//!
//! Overflow (text that does not fit even at the floor size) never aborts a
//! render. The best-effort layout is painted, a warning is logged and the
//! outcome carries the flag so callers can decide what to do.

use crate::config::OverlayConfig;
use crate::imaging::{BrightnessVerdict, Palette, Region, TextBackend, classify, resize_to_canvas};
use crate::layout::{
    BandStyle, LayoutError, RenderReport, TextBlock, caption_box, description_top, fit_text,
    render_banded, render_plain, title_top,
};
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("Text backend has no typeface for {section} style '{style}'")]
    UnknownStyle { section: &'static str, style: String },
}

/// Which kind of caption to paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CaptionMode {
    /// Large text on a solid band in the upper half.
    Title,
    /// Accent-colored text centered on the photo.
    Description,
}

impl CaptionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
        }
    }
}

/// One painted caption.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCaption {
    pub mode: CaptionMode,
    pub block: TextBlock,
    /// The block did not fit its box even at the minimum font size.
    pub overflow: bool,
    pub report: RenderReport,
}

/// The finished canvas and what went onto it.
#[derive(Debug, Clone)]
pub struct OverlayOutcome {
    pub canvas: RgbImage,
    pub verdict: BrightnessVerdict,
    /// Captions in paint order.
    pub captions: Vec<PlacedCaption>,
}

impl OverlayOutcome {
    pub fn overflow(&self) -> bool {
        self.captions.iter().any(|c| c.overflow)
    }
}

/// Renders captions onto fixed-size canvases.
///
/// Holds borrowed, read-only configuration and fonts, so one instance can be
/// shared by every worker of a batch.
pub struct Overlay<'a, B: TextBackend> {
    config: &'a OverlayConfig,
    backend: &'a B,
}

impl<'a, B: TextBackend> Overlay<'a, B> {
    /// Validate `config` and check `backend` can serve both caption styles.
    pub fn new(config: &'a OverlayConfig, backend: &'a B) -> Result<Self, OverlayError> {
        config.validate()?;
        for (section, style) in [
            ("title", &config.title.style),
            ("description", &config.description.style),
        ] {
            if !backend.has_style(style) {
                return Err(OverlayError::UnknownStyle {
                    section,
                    style: style.clone(),
                });
            }
        }
        Ok(Self { config, backend })
    }

    /// Paint a single caption onto a resized copy of `source`.
    pub fn render(
        &self,
        source: &DynamicImage,
        text: &str,
        mode: CaptionMode,
    ) -> Result<OverlayOutcome, OverlayError> {
        require_text(text, mode)?;
        let (mut canvas, verdict) = self.prepare_canvas(source)?;
        let caption = match mode {
            CaptionMode::Title => self.place_title(&mut canvas, text)?,
            CaptionMode::Description => {
                let area = caption_box(self.config.canvas.size(), self.config.layout.safe_margin);
                self.place_description(&mut canvas, text, verdict, area, None)?
            }
        };
        Ok(OverlayOutcome {
            canvas,
            verdict,
            captions: vec![caption],
        })
    }

    /// Paint a title band and, below it, a description on one canvas.
    ///
    /// The description gets the space from `margin_between_sections` under the
    /// band down to the bottom safe margin and is centered in it.
    pub fn render_card(
        &self,
        source: &DynamicImage,
        title: &str,
        description: &str,
    ) -> Result<OverlayOutcome, OverlayError> {
        require_text(title, CaptionMode::Title)?;
        require_text(description, CaptionMode::Description)?;
        let (mut canvas, verdict) = self.prepare_canvas(source)?;

        let title_caption = self.place_title(&mut canvas, title)?;
        let band_bottom = title_caption
            .report
            .band
            .map(|band| band.bottom())
            .unwrap_or(self.config.layout.safe_margin as i32);

        let layout = &self.config.layout;
        let (width, height) = self.config.canvas.size();
        let top = band_bottom.saturating_add(
            i32::try_from(layout.margin_between_sections).unwrap_or(i32::MAX),
        );
        let bottom = i64::from(height) - i64::from(layout.safe_margin);
        let area = Region::new(
            i32::try_from(layout.safe_margin).unwrap_or(i32::MAX),
            top,
            width.saturating_sub(layout.safe_margin.saturating_mul(2)),
            (bottom - i64::from(top)).max(1) as u32,
        );
        let description_caption =
            self.place_description(&mut canvas, description, verdict, area, Some(area.y))?;

        Ok(OverlayOutcome {
            canvas,
            verdict,
            captions: vec![title_caption, description_caption],
        })
    }

    /// Resize `source` to the canvas, classify it and apply the verdict's
    /// adjustment.
    fn prepare_canvas(
        &self,
        source: &DynamicImage,
    ) -> Result<(RgbImage, BrightnessVerdict), OverlayError> {
        if source.width() == 0 || source.height() == 0 {
            return Err(OverlayError::InvalidInput("source image is empty".into()));
        }
        let (width, height) = self.config.canvas.size();
        let mut canvas = resize_to_canvas(source, width, height);
        let verdict = classify(&canvas, self.config.brightness.thresholds());
        verdict.adjustment().apply(&mut canvas);
        debug!(verdict = verdict.as_str(), "classified canvas");
        Ok((canvas, verdict))
    }

    fn place_title(&self, canvas: &mut RgbImage, text: &str) -> Result<PlacedCaption, OverlayError> {
        let layout = &self.config.layout;
        let (_, height) = self.config.canvas.size();
        let area = caption_box(self.config.canvas.size(), layout.safe_margin);

        let fit = fit_text(
            self.backend,
            text,
            &self.config.title.font(),
            (area.width, area.height),
            layout.padding,
            layout.min_font_size,
        )?;
        let top = title_top(
            height,
            layout.safe_margin,
            fit.block.total_height,
            layout.title_lift,
            layout.padding,
        );
        let style = BandStyle {
            x: area.x,
            width: area.width,
            fill: Palette::BAND,
            text_color: Palette::BAND_TEXT,
        };
        let report = render_banded(canvas, self.backend, &fit.block, &style, top, layout.padding)?;
        report_overflow(CaptionMode::Title, &fit.block, fit.overflow, area);

        Ok(PlacedCaption {
            mode: CaptionMode::Title,
            block: fit.block,
            overflow: fit.overflow,
            report,
        })
    }

    /// Fit a description into `area` and paint it in the accent color.
    ///
    /// With `within` set, the block is centered vertically inside `area`
    /// starting no higher than that row; otherwise it is centered on the
    /// whole canvas.
    fn place_description(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        verdict: BrightnessVerdict,
        area: Region,
        within: Option<i32>,
    ) -> Result<PlacedCaption, OverlayError> {
        let layout = &self.config.layout;
        let (_, height) = self.config.canvas.size();

        let fit = fit_text(
            self.backend,
            text,
            &self.config.description.font(),
            (area.width, area.height),
            layout.padding,
            layout.min_font_size,
        )?;
        let total = fit.block.total_height;
        let top = match within {
            Some(min_top) => {
                let offset = (i64::from(area.height) - i64::from(total)).div_euclid(2);
                let top = (i64::from(area.y) + offset).max(i64::from(min_top));
                i32::try_from(top).unwrap_or(i32::MAX)
            }
            None => description_top(height, layout.safe_margin, total),
        };
        let report = render_plain(
            canvas,
            self.backend,
            &fit.block,
            (area.x, top),
            area.width,
            verdict.accent(),
            layout.padding,
        )?;
        report_overflow(CaptionMode::Description, &fit.block, fit.overflow, area);

        Ok(PlacedCaption {
            mode: CaptionMode::Description,
            block: fit.block,
            overflow: fit.overflow,
            report,
        })
    }
}

fn require_text(text: &str, mode: CaptionMode) -> Result<(), OverlayError> {
    if text.trim().is_empty() {
        return Err(OverlayError::InvalidInput(format!(
            "{} text is empty",
            mode.as_str()
        )));
    }
    Ok(())
}

fn report_overflow(mode: CaptionMode, block: &TextBlock, overflow: bool, area: Region) {
    if overflow {
        warn!(
            caption = mode.as_str(),
            font = %block.font,
            height = block.total_height,
            limit = area.height,
            "caption does not fit even at the minimum font size; painted anyway"
        );
    }
}
