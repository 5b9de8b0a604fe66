use std::time::Duration;

/// Statistics collected while ingesting a batch of files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub files_processed: usize,
    pub files_failed: usize,
    /// Files never started because the batch was cancelled
    pub files_skipped: usize,
    pub lines_read: usize,
    pub entries_parsed: usize,
    pub malformed_lines: usize,
    /// Empty or whitespace-only lines; neither entries nor malformed
    pub blank_lines: usize,
    pub missing_request_id: usize,
    pub missing_user_id: usize,
    pub processing_time: Duration,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold per-file counters into a batch total. Timing is left to the caller.
    pub fn merge(&mut self, other: &IngestStats) {
        self.files_processed += other.files_processed;
        self.files_failed += other.files_failed;
        self.files_skipped += other.files_skipped;
        self.lines_read += other.lines_read;
        self.entries_parsed += other.entries_parsed;
        self.malformed_lines += other.malformed_lines;
        self.blank_lines += other.blank_lines;
        self.missing_request_id += other.missing_request_id;
        self.missing_user_id += other.missing_user_id;
    }

    pub fn format_stats(&self) -> String {
        let mut output = format!(
            "Lines processed: {} total, {} parsed, {} malformed",
            self.lines_read, self.entries_parsed, self.malformed_lines
        );
        if self.blank_lines > 0 {
            output.push_str(&format!(", {} blank", self.blank_lines));
        }

        if self.missing_request_id > 0 || self.missing_user_id > 0 {
            output.push_str(&format!(
                "; degraded: {} without request_id, {} without user_id",
                self.missing_request_id, self.missing_user_id
            ));
        }

        output.push_str(&format!("; Files: {} read", self.files_processed));
        if self.files_failed > 0 {
            output.push_str(&format!(", {} unreadable", self.files_failed));
        }
        if self.files_skipped > 0 {
            output.push_str(&format!(", {} skipped", self.files_skipped));
        }

        let processing_time_ms = self.processing_time.as_millis();
        output.push_str(&format!(" in {}ms", processing_time_ms));

        if processing_time_ms > 0 && self.lines_read > 0 {
            let lines_per_sec = (self.lines_read as f64 * 1000.0) / processing_time_ms as f64;
            output.push_str(&format!(" ({:.0} lines/s)", lines_per_sec));
        }

        output
    }
}
