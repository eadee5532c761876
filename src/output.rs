//! CLI output formatting for renders and batches.
//!
//! # Information-First Display
//!
//! Every card leads with what was painted (verdict, captions, chosen sizes);
//! file paths come second as indented context. Overflow is called out on the
//! caption it belongs to so it is never lost in a long batch log.
//!
//! # Output Format
//!
//! ## Render / Card
//!
//! ```text
//! cards/everest.png (dark)
//!     title: bold@35, 2 lines
//!     description: black@28, 4 lines, OVERFLOW
//! ```
//!
//! ## Batch
//!
//! ```text
//! 001/003 cards/everest.png (dark)
//!     Source: photos/everest.jpg
//!     title: bold@35, 2 lines
//! 002/003 cards/k2.png FAILED
//!     Source: photos/k2.jpg
//!     Error: Failed to decode photos/k2.jpg: ...
//!
//! Rendered 2 of 3 cards, 1 failed, 0 overflowed
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::imaging::BrightnessVerdict;
use crate::overlay::{CaptionMode, OverlayOutcome};
use crate::process::{BatchReport, CaptionSummary, JobReport, ProcessEvent};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural_lines(n: usize) -> String {
    if n == 1 {
        "1 line".to_string()
    } else {
        format!("{n} lines")
    }
}

/// Format one caption summary line.
///
/// ```text
/// title: bold@35, 2 lines
/// description: black@10, 9 lines, OVERFLOW
/// ```
fn caption_line(mode: CaptionMode, style: &str, size: u32, lines: usize, overflow: bool) -> String {
    let mut line = format!(
        "{}{}: {}@{}, {}",
        indent(1),
        mode.as_str(),
        style,
        size,
        plural_lines(lines)
    );
    if overflow {
        line.push_str(", OVERFLOW");
    }
    line
}

fn card_header(output: &Path, verdict: Option<BrightnessVerdict>) -> String {
    match verdict {
        Some(v) => format!("{} ({})", output.display(), v.as_str()),
        None => format!("{} FAILED", output.display()),
    }
}

// ============================================================================
// Render / card output
// ============================================================================

/// Format the result of a single `render` or `card` command.
pub fn format_render_output(outcome: &OverlayOutcome, output: &Path) -> Vec<String> {
    let mut lines = vec![card_header(output, Some(outcome.verdict))];
    for caption in &outcome.captions {
        lines.push(caption_line(
            caption.mode,
            caption.block.font.style(),
            caption.block.font.size(),
            caption.block.lines.len(),
            caption.overflow,
        ));
    }
    lines
}

pub fn print_render_output(outcome: &OverlayOutcome, output: &Path) {
    for line in format_render_output(outcome, output) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch output
// ============================================================================

fn job_lines(report: &JobReport) -> Vec<String> {
    let mut lines = vec![format!("{}Source: {}", indent(1), report.source.display())];
    for CaptionSummary {
        mode,
        style,
        font_size,
        lines: count,
        overflow,
    } in &report.captions
    {
        lines.push(caption_line(*mode, style, *font_size, *count, *overflow));
    }
    if let Some(error) = &report.error {
        lines.push(format!("{}Error: {}", indent(1), error));
    }
    lines
}

/// Format a single batch progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::JobFinished {
            index,
            total,
            report,
        } => {
            let width = total.to_string().len().max(3);
            let mut lines = vec![format!(
                "{:0>width$}/{:0>width$} {}",
                index + 1,
                total,
                card_header(&report.output, report.verdict),
            )];
            lines.extend(job_lines(report));
            lines
        }
    }
}

/// Format the closing summary of a batch.
pub fn format_batch_summary(report: &BatchReport) -> Vec<String> {
    vec![format!(
        "Rendered {} of {} cards, {} failed, {} overflowed",
        report.rendered,
        report.jobs.len(),
        report.failed,
        report.overflowed
    )]
}

pub fn print_batch_summary(report: &BatchReport) {
    println!();
    for line in format_batch_summary(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Font;
    use crate::layout::{RenderReport, TextBlock};
    use crate::overlay::PlacedCaption;
    use image::RgbImage;
    use std::path::PathBuf;

    fn summary(mode: CaptionMode, overflow: bool) -> CaptionSummary {
        CaptionSummary {
            mode,
            style: "bold".into(),
            font_size: 35,
            lines: 2,
            overflow,
        }
    }

    fn job(verdict: Option<BrightnessVerdict>, error: Option<&str>) -> JobReport {
        JobReport {
            source: PathBuf::from("photos/everest.jpg"),
            output: PathBuf::from("cards/everest.png"),
            verdict,
            captions: if error.is_some() {
                vec![]
            } else {
                vec![summary(CaptionMode::Title, false)]
            },
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_lines_singular() {
        assert_eq!(plural_lines(1), "1 line");
        assert_eq!(plural_lines(3), "3 lines");
    }

    #[test]
    fn caption_line_marks_overflow() {
        assert_eq!(
            caption_line(CaptionMode::Description, "black", 10, 9, true),
            "    description: black@10, 9 lines, OVERFLOW"
        );
        assert_eq!(
            caption_line(CaptionMode::Title, "bold", 35, 1, false),
            "    title: bold@35, 1 line"
        );
    }

    #[test]
    fn format_render_lists_captions() {
        let outcome = OverlayOutcome {
            canvas: RgbImage::new(1, 1),
            verdict: BrightnessVerdict::MidLight,
            captions: vec![PlacedCaption {
                mode: CaptionMode::Title,
                block: TextBlock {
                    lines: vec!["Top 5 mountains in".into(), "the world".into()],
                    font: Font::new("bold", 35),
                    line_height: 42,
                    total_height: 89,
                },
                overflow: false,
                report: RenderReport::default(),
            }],
        };

        let lines = format_render_output(&outcome, Path::new("card.png"));
        assert_eq!(
            lines,
            vec!["card.png (mid-light)", "    title: bold@35, 2 lines"]
        );
    }

    #[test]
    fn format_event_success() {
        let event = ProcessEvent::JobFinished {
            index: 0,
            total: 3,
            report: job(Some(BrightnessVerdict::Dark), None),
        };
        assert_eq!(
            format_process_event(&event),
            vec![
                "001/003 cards/everest.png (dark)",
                "    Source: photos/everest.jpg",
                "    title: bold@35, 2 lines",
            ]
        );
    }

    #[test]
    fn format_event_failure() {
        let event = ProcessEvent::JobFinished {
            index: 1,
            total: 3,
            report: job(None, Some("boom")),
        };
        let lines = format_process_event(&event);
        assert_eq!(lines[0], "002/003 cards/everest.png FAILED");
        assert_eq!(lines.last().unwrap(), "    Error: boom");
    }

    #[test]
    fn format_event_widens_counter_for_large_batches() {
        let event = ProcessEvent::JobFinished {
            index: 41,
            total: 1200,
            report: job(Some(BrightnessVerdict::Light), None),
        };
        assert!(format_process_event(&event)[0].starts_with("0042/1200 "));
    }

    #[test]
    fn batch_summary_counts() {
        let report = BatchReport {
            rendered: 2,
            failed: 1,
            overflowed: 0,
            jobs: vec![
                job(Some(BrightnessVerdict::Dark), None),
                job(Some(BrightnessVerdict::Dark), None),
                job(None, Some("boom")),
            ],
        };
        assert_eq!(
            format_batch_summary(&report),
            vec!["Rendered 2 of 3 cards, 1 failed, 0 overflowed"]
        );
    }
}
