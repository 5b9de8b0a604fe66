//! Main batch processor
//!
//! Contains the BatchProcessor struct that orchestrates the worker pool.

use crossbeam_channel::{bounded, unbounded};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use crate::error::Result;
use crate::platform::CancellationToken;

use super::sink::result_sink;
use super::types::{BatchOutcome, BatchStatus, ParallelConfig};
use super::worker::worker_thread;

/// Reads a closed set of files on a bounded pool of worker threads
#[derive(Debug)]
pub struct BatchProcessor {
    config: ParallelConfig,
}

impl BatchProcessor {
    /// Fails fast on an invalid worker count, before any thread exists
    pub fn new(config: ParallelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn num_workers(&self) -> usize {
        self.config.num_workers
    }

    /// Ingest every path and merge the entries.
    ///
    /// Unreadable files are skipped. If `cancel` fires, idle workers stop
    /// taking paths, workers already inside a file finish it, and everything
    /// collected so far is returned with [`BatchStatus::Cancelled`]. All
    /// worker threads have exited when this returns.
    pub fn process(&self, paths: &[PathBuf], cancel: &CancellationToken) -> BatchOutcome {
        let start = Instant::now();

        if paths.is_empty() {
            return BatchOutcome::empty();
        }

        if cancel.is_cancelled() {
            let mut outcome = BatchOutcome::empty();
            outcome.status = BatchStatus::Cancelled;
            outcome.stats.files_skipped = paths.len();
            return outcome;
        }

        // Pre-filled and closed: workers see a disconnect once it is empty
        let (path_sender, path_receiver) = bounded(paths.len());
        for path in paths {
            if path_sender.send(path.clone()).is_err() {
                break;
            }
        }
        drop(path_sender);

        let (result_sender, result_receiver) = match self.config.result_buffer {
            Some(size) => bounded(size),
            None => unbounded(),
        };

        let worker_count = self.config.num_workers.min(paths.len());
        let mut worker_handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let path_receiver = path_receiver.clone();
            let result_sender = result_sender.clone();
            let worker_cancel = cancel.clone();

            let handle = thread::spawn(move || {
                worker_thread(worker_id, path_receiver, result_sender, worker_cancel)
            });
            worker_handles.push(handle);
        }

        // Drop our copies so the sink sees a disconnect when the last worker exits
        drop(result_sender);
        drop(path_receiver);

        tracing::debug!(
            files = paths.len(),
            workers = worker_count,
            "started ingestion workers"
        );

        let merged = result_sink(result_receiver);

        for (idx, handle) in worker_handles.into_iter().enumerate() {
            if handle.join().is_err() {
                tracing::error!(worker = idx, "worker thread panicked");
            }
        }

        let mut stats = merged.stats;
        let accounted = stats.files_processed + stats.files_failed;
        stats.files_skipped = paths.len().saturating_sub(accounted);
        stats.processing_time = start.elapsed();

        let status = if cancel.is_cancelled() && stats.files_skipped > 0 {
            BatchStatus::Cancelled
        } else {
            BatchStatus::Completed
        };

        BatchOutcome {
            entries: merged.entries,
            status,
            stats,
        }
    }
}
