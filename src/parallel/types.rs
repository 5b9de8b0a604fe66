//! Type definitions for parallel ingestion
//!
//! Contains the pool configuration, the messages workers send to the result
//! sink, and the outcome returned to the caller.

use std::path::PathBuf;

use crate::error::{AnalyzerError, Result};
use crate::event::LogEntry;
use crate::readers::FileIngest;
use crate::stats::IngestStats;

/// Worker count used when none is configured
pub const DEFAULT_NUM_WORKERS: usize = 5;

/// Configuration for parallel ingestion
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    pub num_workers: usize,
    /// Capacity of the worker → sink channel; `None` means unbounded
    pub result_buffer: Option<usize>,
}

impl ParallelConfig {
    pub fn with_workers(num_workers: usize) -> Self {
        Self {
            num_workers,
            result_buffer: Some(num_workers.saturating_mul(4).max(1)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(AnalyzerError::configuration(
                "worker count must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self::with_workers(DEFAULT_NUM_WORKERS)
    }
}

/// Message type for worker → sink communication
#[derive(Debug)]
pub(crate) enum WorkResult {
    /// A file was read to the end
    Ingested(FileIngest),
    /// A file could not be opened or read
    Unavailable { path: PathBuf, error: AnalyzerError },
    /// A worker gave up a path it had dequeued because cancellation arrived first
    Abandoned { path: PathBuf },
}

/// How a batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Completed,
    /// Cancellation stopped dispatch before every path was started
    Cancelled,
}

/// Merged result of one batch run
#[derive(Debug)]
pub struct BatchOutcome {
    pub entries: Vec<LogEntry>,
    pub status: BatchStatus,
    pub stats: IngestStats,
}

impl BatchOutcome {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            status: BatchStatus::Completed,
            stats: IngestStats::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BatchStatus::Cancelled
    }
}
