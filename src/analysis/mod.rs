//! Request correlation and failure analysis
//!
//! Runs single-threaded over the merged entries once ingestion is done:
//! group by request id, flag failed groups, rebuild their timelines and
//! assemble the report.

pub mod correlate;
pub mod detect;
pub mod report;
pub mod timeline;

pub use correlate::{correlate, CorrelatedGroups, ORPHANS_KEY};
pub use detect::{detect_failed_requests, is_failing_level, FailedRequests};
pub use report::{assemble_report, write_json_report, AnalysisResult, STDOUT_TARGET};
pub use timeline::{
    build_failure_record, find_first_failure, format_timeline_line, sort_timeline, FailureRecord,
};
