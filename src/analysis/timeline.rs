use serde::Serialize;

use crate::error::{AnalyzerError, Result};
use crate::event::LogEntry;

use super::detect::is_failing_level;

/// Summary of one failed request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub request_id: String,
    /// Service of the earliest failing entry
    pub failing_service: String,
    pub error_message: String,
    /// Every entry of the request, oldest first
    pub timeline: Vec<String>,
}

/// Copy of `entries` sorted by timestamp; ties keep their original order
pub fn sort_timeline(entries: &[LogEntry]) -> Vec<LogEntry> {
    let mut sorted = entries.to_vec();
    // sort_by_key is stable
    sorted.sort_by_key(|e| e.timestamp);
    sorted
}

/// Earliest failing entry, or `None` when nothing in the group fails
pub fn find_first_failure(entries: &[LogEntry]) -> Option<&LogEntry> {
    entries
        .iter()
        .filter(|e| is_failing_level(&e.level))
        // min_by_key returns the first of equal minima
        .min_by_key(|e| e.timestamp)
}

pub fn format_timeline_line(entry: &LogEntry) -> String {
    entry.to_string()
}

pub fn build_failure_record(request_id: &str, entries: &[LogEntry]) -> Result<FailureRecord> {
    let first = find_first_failure(entries).ok_or_else(|| AnalyzerError::NoFailureFound {
        request_id: request_id.to_string(),
    })?;

    let timeline = sort_timeline(entries)
        .iter()
        .map(format_timeline_line)
        .collect();

    Ok(FailureRecord {
        request_id: request_id.to_string(),
        failing_service: first.service.clone(),
        error_message: first.message.clone(),
        timeline,
    })
}
