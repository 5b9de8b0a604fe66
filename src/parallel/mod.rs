//! Parallel ingestion module for reqtrace
//!
//! Reads a closed set of log files on a fixed pool of worker threads and
//! merges their entries.
//!
//! # Module Structure
//!
//! - `types`: Configuration, worker messages and the batch outcome
//! - `worker`: Worker thread that ingests one file at a time
//! - `sink`: Result merging on the calling thread
//! - `processor`: Main BatchProcessor orchestration

mod processor;
mod sink;
mod types;
mod worker;

// Re-export public types
pub use processor::BatchProcessor;
pub use types::{BatchOutcome, BatchStatus, ParallelConfig, DEFAULT_NUM_WORKERS};
