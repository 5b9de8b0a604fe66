use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// A single parsed log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub service: String,
    pub message: String,
    /// Correlation key, empty when the line carried none
    pub request_id: String,
    /// Informational only; never used for correlation or failure detection
    pub user_id: String,
}

impl LogEntry {
    pub fn has_request_id(&self) -> bool {
        !self.request_id.is_empty()
    }

    pub fn has_user_id(&self) -> bool {
        !self.user_id.is_empty()
    }

    /// Timestamp in the same textual form the input grammar uses
    pub fn formatted_timestamp(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

/// Render as `<timestamp> [<level>] <service>: <message>`
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.formatted_timestamp(),
            self.level,
            self.service,
            self.message
        )
    }
}

/// Millisecond precision with a trailing `Z`, e.g. `2023-12-25T14:30:15.123Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
