// Core library for the reqtrace request-correlation tool

pub mod analysis;
pub mod cli;
pub mod config;
pub mod config_file;
pub mod error;
pub mod event;
pub mod logging;
pub mod parallel;
pub mod parsers;
pub mod platform;
pub mod readers;
pub mod scanner;
pub mod stats;
pub mod tty;

use std::path::PathBuf;
use std::time::Instant;

pub use analysis::{AnalysisResult, FailureRecord};
pub use cli::{Cli, ColorMode};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use event::LogEntry;
pub use parallel::{BatchProcessor, BatchStatus, ParallelConfig};
pub use platform::CancellationToken;
pub use stats::IngestStats;

/// Everything a finished run produced
#[derive(Debug)]
pub struct RunOutput {
    pub result: AnalysisResult,
    pub status: BatchStatus,
    pub stats: IngestStats,
}

impl RunOutput {
    pub fn is_partial(&self) -> bool {
        self.status == BatchStatus::Cancelled
    }
}

/// Ingest `paths`, correlate the entries and build the report.
///
/// `started` marks the beginning of the run; the report's processing time is
/// measured from it. A cancelled batch still goes through analysis and the
/// result is flagged as partial.
pub fn analyze_paths(
    paths: &[PathBuf],
    parallel: ParallelConfig,
    cancel: &CancellationToken,
    started: Instant,
) -> Result<RunOutput> {
    let processor = BatchProcessor::new(parallel)?;
    let outcome = processor.process(paths, cancel);
    let partial = outcome.is_cancelled();

    if partial {
        tracing::warn!(
            files_skipped = outcome.stats.files_skipped,
            "ingestion cancelled, analysing the files read so far"
        );
    }

    let groups = analysis::correlate(&outcome.entries);
    let failed = analysis::detect_failed_requests(&groups);
    tracing::info!(
        entries = outcome.entries.len(),
        requests = groups.len(),
        failed = failed.len(),
        "correlation finished"
    );

    let result = analysis::assemble_report(
        outcome.entries.len(),
        &groups,
        &failed,
        started.elapsed(),
        partial,
    );

    Ok(RunOutput {
        result,
        status: outcome.status,
        stats: outcome.stats,
    })
}
