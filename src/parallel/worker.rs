//! Worker thread for parallel ingestion
//!
//! Each worker pulls one path at a time from the shared queue and reads the
//! whole file before looking at the queue again.

use crossbeam_channel::{select, Receiver, Sender};
use std::path::PathBuf;

use crate::platform::CancellationToken;
use crate::readers::ingest_file;

use super::types::WorkResult;

/// Worker thread: ingests files until the queue is empty or the batch is cancelled
pub(crate) fn worker_thread(
    worker_id: usize,
    path_receiver: Receiver<PathBuf>,
    result_sender: Sender<WorkResult>,
    cancel: CancellationToken,
) {
    let cancelled = cancel.notified();
    let mut files_done = 0usize;

    loop {
        if cancel.is_cancelled() {
            break;
        }

        select! {
            // Only fires once the token drops its sender
            recv(cancelled) -> _ => break,
            recv(path_receiver) -> msg => {
                let path = match msg {
                    Ok(path) => path,
                    Err(_) => break,
                };

                // select! picks randomly when both are ready
                if cancel.is_cancelled() {
                    let _ = result_sender.send(WorkResult::Abandoned { path });
                    break;
                }

                let result = match ingest_file(&path) {
                    Ok(ingest) => WorkResult::Ingested(ingest),
                    Err(error) => WorkResult::Unavailable { path, error },
                };
                files_done += 1;

                if result_sender.send(result).is_err() {
                    break;
                }
            }
        }
    }

    tracing::trace!(worker = worker_id, files = files_done, "worker finished");
}
