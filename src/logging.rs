//! Diagnostic logging setup.
//!
//! Library code only emits `tracing` events; the binary decides where they
//! go. Warnings (overflowing captions, failed batch jobs) are always shown,
//! `--verbose` adds the per-caption fit and classification details.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt;

/// Install the stderr subscriber. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let _ = fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
}
