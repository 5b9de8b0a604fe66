//! Result sink for parallel ingestion
//!
//! Runs on the calling thread and merges worker output until every worker
//! has dropped its sender.

use crossbeam_channel::Receiver;

use crate::event::LogEntry;
use crate::stats::IngestStats;

use super::types::WorkResult;

#[derive(Debug, Default)]
pub(crate) struct SinkResult {
    pub entries: Vec<LogEntry>,
    pub stats: IngestStats,
}

/// Drain worker results. Each file's entries are appended as one block, so
/// intra-file order survives; order between files follows arrival.
pub(crate) fn result_sink(result_receiver: Receiver<WorkResult>) -> SinkResult {
    let mut merged = SinkResult::default();

    while let Ok(result) = result_receiver.recv() {
        match result {
            WorkResult::Ingested(ingest) => {
                merged.stats.merge(&ingest.stats);
                merged.entries.extend(ingest.entries);
            }
            WorkResult::Unavailable { path, error } => {
                merged.stats.files_failed += 1;
                tracing::error!(
                    path = %path.display(),
                    error = %error,
                    "failed to read log file, skipping"
                );
            }
            WorkResult::Abandoned { path } => {
                tracing::debug!(path = %path.display(), "not started, batch cancelled");
            }
        }
    }

    merged
}
