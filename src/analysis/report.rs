//! Report assembly and JSON output
//!
//! Turns the failed request ids into [`FailureRecord`]s and writes the
//! summary document.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Duration;

use crate::error::{AnalyzerError, Result};

use super::correlate::CorrelatedGroups;
use super::detect::FailedRequests;
use super::timeline::{build_failure_record, find_first_failure, FailureRecord};

/// Target name that sends the report to stdout
pub const STDOUT_TARGET: &str = "-";

/// Summary document written at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub total_entries_processed: usize,
    /// Number of ids the detector flagged
    pub failed_requests_found: usize,
    pub processing_time_seconds: f64,
    pub failed_requests: Vec<FailureRecord>,
    /// Set when ingestion was cancelled and only part of the input was read
    #[serde(skip_serializing_if = "is_false")]
    pub partial: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Build the report for every flagged id.
///
/// Records are ordered by the time of their first failure, then by id, so
/// the same input always yields the same document.
pub fn assemble_report(
    total_entries: usize,
    groups: &CorrelatedGroups,
    failed: &FailedRequests,
    elapsed: Duration,
    partial: bool,
) -> AnalysisResult {
    let mut records = Vec::with_capacity(failed.len());

    for request_id in failed {
        let entries = groups.get(request_id).unwrap_or(&[]);
        match build_failure_record(request_id, entries) {
            Ok(record) => {
                // build_failure_record succeeded, so a failing entry exists
                let first_at = find_first_failure(entries).map(|e| e.timestamp);
                records.push((first_at, record));
            }
            Err(err) => {
                tracing::error!(
                    request_id = %request_id,
                    error = %err,
                    "flagged request has no failing entry, record skipped"
                );
            }
        }
    }

    records.sort_by(|(a_at, a), (b_at, b)| {
        a_at.cmp(b_at).then_with(|| a.request_id.cmp(&b.request_id))
    });

    AnalysisResult {
        total_entries_processed: total_entries,
        failed_requests_found: failed.len(),
        processing_time_seconds: elapsed.as_secs_f64(),
        failed_requests: records.into_iter().map(|(_, record)| record).collect(),
        partial,
    }
}

/// Serialize `result` to `target`, pretty-printed unless `pretty` is false.
/// A target of `-` writes to stdout; any other target is created or truncated.
pub fn write_json_report(result: &AnalysisResult, target: &str, pretty: bool) -> Result<()> {
    let report_err = |source: io::Error| AnalyzerError::Report {
        target: target.to_string(),
        source,
    };

    if target == STDOUT_TARGET {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_json(result, &mut handle, pretty).map_err(report_err)
    } else {
        let file = File::create(target).map_err(report_err)?;
        let mut writer = BufWriter::new(file);
        write_json(result, &mut writer, pretty).map_err(report_err)
    }
}

fn write_json<W: Write>(result: &AnalysisResult, writer: &mut W, pretty: bool) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, result)?;
    } else {
        serde_json::to_writer(&mut *writer, result)?;
    }
    writeln!(writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::correlate::correlate;
    use crate::analysis::detect::detect_failed_requests;
    use crate::event::LogEntry;
    use crate::parsers::parse_line;
    use tempfile::TempDir;

    fn entries(lines: &[&str]) -> Vec<LogEntry> {
        lines
            .iter()
            .map(|line| parse_line(line).unwrap().entry)
            .collect()
    }

    #[test]
    fn test_assemble_orders_by_first_failure() {
        let entries = entries(&[
            "2024-01-01T00:00:05.000Z [ERROR] db: late, request_id=b",
            "2024-01-01T00:00:01.000Z [INFO] api: start, request_id=a",
            "2024-01-01T00:00:02.000Z [WARN] api: slow, request_id=a",
            "2024-01-01T00:00:03.000Z [INFO] api: fine, request_id=c",
        ]);
        let groups = correlate(&entries);
        let failed = detect_failed_requests(&groups);

        let result = assemble_report(entries.len(), &groups, &failed, Duration::ZERO, false);

        assert_eq!(result.total_entries_processed, 4);
        assert_eq!(result.failed_requests_found, 2);
        let ids: Vec<&str> = result
            .failed_requests
            .iter()
            .map(|r| r.request_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(result.failed_requests[0].timeline.len(), 2);
    }

    #[test]
    fn test_equal_first_failure_orders_by_id() {
        let entries = entries(&[
            "2024-01-01T00:00:01.000Z [ERROR] svc: x, request_id=zeta",
            "2024-01-01T00:00:01.000Z [ERROR] svc: y, request_id=alpha",
        ]);
        let groups = correlate(&entries);
        let failed = detect_failed_requests(&groups);
        let result = assemble_report(2, &groups, &failed, Duration::ZERO, false);

        assert_eq!(result.failed_requests[0].request_id, "alpha");
        assert_eq!(result.failed_requests[1].request_id, "zeta");
    }

    #[test]
    fn test_mismatched_id_is_skipped_but_counted() {
        let entries = entries(&["2024-01-01T00:00:01.000Z [INFO] svc: ok, request_id=r1"]);
        let groups = correlate(&entries);
        let mut failed = FailedRequests::new();
        failed.insert("r1".to_string());

        let result = assemble_report(1, &groups, &failed, Duration::ZERO, false);
        assert_eq!(result.failed_requests_found, 1);
        assert!(result.failed_requests.is_empty());
    }

    #[test]
    fn test_partial_flag_only_serialized_when_set() {
        let groups = correlate(&[]);
        let failed = FailedRequests::new();

        let complete = assemble_report(0, &groups, &failed, Duration::from_millis(1500), false);
        let json = serde_json::to_value(&complete).unwrap();
        assert!(json.get("partial").is_none());
        assert_eq!(json["processing_time_seconds"], 1.5);

        let partial = assemble_report(0, &groups, &failed, Duration::ZERO, true);
        let json = serde_json::to_value(&partial).unwrap();
        assert_eq!(json["partial"], true);
    }

    #[test]
    fn test_field_order_and_names() {
        let entries = entries(&["2024-01-01T00:00:01.000Z [ERROR] pay: boom, request_id=r1"]);
        let groups = correlate(&entries);
        let failed = detect_failed_requests(&groups);
        let result = assemble_report(1, &groups, &failed, Duration::ZERO, false);

        let text = serde_json::to_string(&result).unwrap();
        let total = text.find("total_entries_processed").unwrap();
        let found = text.find("failed_requests_found").unwrap();
        let time = text.find("processing_time_seconds").unwrap();
        let list = text.find("\"failed_requests\"").unwrap();
        assert!(total < found && found < time && time < list);
        assert!(text.contains("\"failing_service\":\"pay\""));
        assert!(text.contains("\"error_message\":\"boom\""));
    }

    #[test]
    fn test_write_pretty_and_compact_files() {
        let dir = TempDir::new().unwrap();
        let result = assemble_report(
            0,
            &correlate(&[]),
            &FailedRequests::new(),
            Duration::ZERO,
            false,
        );

        let pretty_path = dir.path().join("pretty.json");
        write_json_report(&result, pretty_path.to_str().unwrap(), true).unwrap();
        let pretty = std::fs::read_to_string(&pretty_path).unwrap();
        assert!(pretty.contains("\n  \"total_entries_processed\": 0"));

        let compact_path = dir.path().join("compact.json");
        write_json_report(&result, compact_path.to_str().unwrap(), false).unwrap();
        let compact = std::fs::read_to_string(&compact_path).unwrap();
        assert_eq!(compact.trim_end().lines().count(), 1);

        let parsed: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(parsed["failed_requests"], serde_json::json!([]));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("no/such/dir/out.json");
        let result = assemble_report(
            0,
            &correlate(&[]),
            &FailedRequests::new(),
            Duration::ZERO,
            false,
        );
        let err = write_json_report(&result, target.to_str().unwrap(), true).unwrap_err();
        assert!(matches!(err, AnalyzerError::Report { .. }));
    }
}
