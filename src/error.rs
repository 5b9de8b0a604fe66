//! Error types shared by the ingestion and analysis stages.
//!
//! Per-line and per-file failures are contained by the stage that sees them;
//! only configuration, scan and report errors travel back to `main`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for reqtrace operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A log file could not be opened or read
    #[error("cannot read {}: {source}", path.display())]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A group flagged as failed has no qualifying entry
    #[error("request '{request_id}' was flagged as failed but has no ERROR/WARN entry")]
    NoFailureFound { request_id: String },

    /// Invalid settings detected before any work starts
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The input directory could not be walked
    #[error("failed to scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The scan finished but produced nothing to ingest
    #[error("no .log files found under {}", path.display())]
    NoInputFiles { path: PathBuf },

    /// The report could not be serialized or written
    #[error("failed to write report to {target}: {source}")]
    Report {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

impl AnalyzerError {
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Errors that come from the caller's settings rather than the data
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
