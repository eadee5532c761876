//! Batch rendering of caption cards.
//!
//! A batch is a list of [`Job`]s, each naming a source photo, an output path
//! and the captions to paint. Jobs come from either source:
//!
//! - **Job file**: a TOML list of `[[job]]` tables, see [`load_jobs`].
//! - **Directory walk**: every supported image under a directory gets the same
//!   caption, mirrored into an output directory, see [`collect_dir_jobs`].
//!
//! ## Job File
//!
//! ```toml
//! [[job]]
//! source = "photos/everest.jpg"
//! output = "cards/everest.png"
//! title = "Top 5 mountains in the world"
//! description = "Mount Everest"
//!
//! [[job]]
//! source = "photos/k2.jpg"
//! output = "cards/k2.png"
//! description = "K2"
//! ```
//!
//! Relative paths are resolved against the job file's directory. A job with
//! only a title or only a description renders that caption alone; a job with
//! both renders a combined card.
//!
//! ## Parallel Processing
//!
//! Jobs are rendered in parallel using [rayon](https://docs.rs/rayon). Every
//! worker shares one read-only [`Overlay`] and owns its own canvas. A job that
//! fails is recorded in the [`BatchReport`] and the batch carries on.

use crate::imaging::{
    BrightnessVerdict, CodecError, TextBackend, codec::is_supported_input, load_image, save_canvas,
};
use crate::overlay::{CaptionMode, Overlay, OverlayError, OverlayOutcome};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Job file parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Image I/O failed: {0}")]
    Codec(#[from] CodecError),
    #[error("Render failed: {0}")]
    Overlay(#[from] OverlayError),
    #[error("Job for {0} has neither a title nor a description")]
    NoCaption(PathBuf),
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),
}

/// One card to render.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub source: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Job {
    /// A job carrying one caption in `mode`.
    pub fn single(source: PathBuf, output: PathBuf, text: &str, mode: CaptionMode) -> Self {
        let text = Some(text.to_string());
        let (title, description) = match mode {
            CaptionMode::Title => (text, None),
            CaptionMode::Description => (None, text),
        };
        Self {
            source,
            output,
            title,
            description,
        }
    }

    fn rebase(mut self, base: &Path) -> Self {
        if self.source.is_relative() {
            self.source = base.join(&self.source);
        }
        if self.output.is_relative() {
            self.output = base.join(&self.output);
        }
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobFile {
    #[serde(default, rename = "job")]
    jobs: Vec<Job>,
}

/// Progress reported while a batch runs.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// A job finished, successfully or not. `index` is its position in the
    /// batch; events arrive in completion order.
    JobFinished {
        index: usize,
        total: usize,
        report: JobReport,
    },
}

/// Per-caption summary of a rendered job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionSummary {
    pub mode: CaptionMode,
    pub style: String,
    pub font_size: u32,
    pub lines: usize,
    pub overflow: bool,
}

/// Outcome of one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub source: PathBuf,
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<BrightnessVerdict>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub captions: Vec<CaptionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobReport {
    fn rendered(job: &Job, outcome: &OverlayOutcome) -> Self {
        let captions = outcome
            .captions
            .iter()
            .map(|c| CaptionSummary {
                mode: c.mode,
                style: c.block.font.style().to_string(),
                font_size: c.block.font.size(),
                lines: c.block.lines.len(),
                overflow: c.overflow,
            })
            .collect();
        Self {
            source: job.source.clone(),
            output: job.output.clone(),
            verdict: Some(outcome.verdict),
            captions,
            error: None,
        }
    }

    fn failed(job: &Job, error: &ProcessError) -> Self {
        Self {
            source: job.source.clone(),
            output: job.output.clone(),
            verdict: None,
            captions: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn overflow(&self) -> bool {
        self.captions.iter().any(|c| c.overflow)
    }
}

/// Everything a batch did, in job order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub rendered: usize,
    pub failed: usize,
    pub overflowed: usize,
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    fn from_jobs(jobs: Vec<JobReport>) -> Self {
        let rendered = jobs.iter().filter(|j| j.is_ok()).count();
        let overflowed = jobs.iter().filter(|j| j.overflow()).count();
        Self {
            rendered,
            failed: jobs.len() - rendered,
            overflowed,
            jobs,
        }
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<(), ProcessError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Read a TOML job file. Relative paths are resolved against its directory.
pub fn load_jobs(path: &Path) -> Result<Vec<Job>, ProcessError> {
    let content = std::fs::read_to_string(path)?;
    let file: JobFile = toml::from_str(&content)?;
    let base = path.parent().unwrap_or(Path::new(""));
    Ok(file.jobs.into_iter().map(|job| job.rebase(base)).collect())
}

/// One job per supported image under `input_dir`, in file-name order.
///
/// Outputs mirror the input tree under `output_dir` and keep the source
/// extension.
pub fn collect_dir_jobs(
    input_dir: &Path,
    output_dir: &Path,
    text: &str,
    mode: CaptionMode,
) -> Result<Vec<Job>, ProcessError> {
    if !input_dir.is_dir() {
        return Err(ProcessError::InputNotFound(input_dir.to_path_buf()));
    }

    let mut jobs = Vec::new();
    for entry in walkdir::WalkDir::new(input_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_supported_input(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(input_dir)
            .unwrap_or(entry.path());
        jobs.push(Job::single(
            entry.path().to_path_buf(),
            output_dir.join(relative),
            text,
            mode,
        ));
    }
    debug!(count = jobs.len(), dir = %input_dir.display(), "collected jobs");
    Ok(jobs)
}

/// Decode, render and save one job.
pub fn render_job<B: TextBackend>(
    overlay: &Overlay<'_, B>,
    job: &Job,
) -> Result<OverlayOutcome, ProcessError> {
    let source = load_image(&job.source)?;
    let outcome = match (job.title.as_deref(), job.description.as_deref()) {
        (Some(title), Some(description)) => overlay.render_card(&source, title, description)?,
        (Some(title), None) => overlay.render(&source, title, CaptionMode::Title)?,
        (None, Some(description)) => {
            overlay.render(&source, description, CaptionMode::Description)?
        }
        (None, None) => return Err(ProcessError::NoCaption(job.source.clone())),
    };
    save_canvas(&outcome.canvas, &job.output)?;
    Ok(outcome)
}

/// Render every job on rayon's pool.
///
/// Failures are captured per job; the batch itself never fails. When
/// `progress` is given, a [`ProcessEvent::JobFinished`] is sent as each job
/// completes. A dropped receiver only silences progress.
pub fn run_batch<B: TextBackend>(
    overlay: &Overlay<'_, B>,
    jobs: &[Job],
    progress: Option<Sender<ProcessEvent>>,
) -> BatchReport {
    let total = jobs.len();
    let reports: Vec<JobReport> = jobs
        .par_iter()
        .enumerate()
        .map_with(progress, |progress, (index, job)| {
            let report = match render_job(overlay, job) {
                Ok(outcome) => JobReport::rendered(job, &outcome),
                Err(e) => {
                    warn!(source = %job.source.display(), error = %e, "job failed");
                    JobReport::failed(job, &e)
                }
            };
            if let Some(tx) = progress {
                tx.send(ProcessEvent::JobFinished {
                    index,
                    total,
                    report: report.clone(),
                })
                .ok();
            }
            report
        })
        .collect();

    let report = BatchReport::from_jobs(reports);
    debug!(
        rendered = report.rendered,
        failed = report.failed,
        overflowed = report.overflowed,
        "batch finished"
    );
    report
}
