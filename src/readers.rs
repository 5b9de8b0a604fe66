use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{AnalyzerError, Result};
use crate::event::LogEntry;
use crate::parsers::parse_line;
use crate::stats::IngestStats;

const DEFAULT_ENTRY_CAPACITY: usize = 100;

/// Entries parsed from one file, in file order
#[derive(Debug)]
pub struct FileIngest {
    pub path: PathBuf,
    pub entries: Vec<LogEntry>,
    pub stats: IngestStats,
}

/// Read and parse one log file.
///
/// Malformed lines are skipped with a diagnostic and never abort the file.
/// Failing to open or read the file is returned as `FileUnavailable`; whether
/// that stops anything else is up to the caller.
pub fn ingest_file(path: &Path) -> Result<FileIngest> {
    let file = File::open(path).map_err(|source| AnalyzerError::FileUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    ingest_reader(path, BufReader::new(file))
}

/// Same as [`ingest_file`] over an already opened reader.
///
/// Empty and whitespace-only lines are not log lines: they are counted in
/// `blank_lines` and reported at debug level, but not as malformed.
pub fn ingest_reader<R: BufRead>(path: &Path, mut reader: R) -> Result<FileIngest> {
    let mut entries = Vec::with_capacity(DEFAULT_ENTRY_CAPACITY);
    let mut stats = IngestStats::new();
    let mut buf = Vec::new();
    let mut line_num = 0usize;

    loop {
        buf.clear();
        let bytes_read =
            reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| AnalyzerError::FileUnavailable {
                    path: path.to_path_buf(),
                    source,
                })?;
        if bytes_read == 0 {
            break;
        }
        line_num += 1;
        stats.lines_read += 1;

        // Invalid UTF-8 should cost one line at most, not the whole file
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            stats.blank_lines += 1;
            tracing::debug!(path = %path.display(), line = line_num, "skipping blank line");
            continue;
        }

        match parse_line(line) {
            Ok(parsed) => {
                if parsed.quality.missing_request_id {
                    stats.missing_request_id += 1;
                    tracing::warn!(
                        path = %path.display(),
                        line = line_num,
                        "request_id not found in log line, grouping as orphan"
                    );
                }
                if parsed.quality.missing_user_id {
                    stats.missing_user_id += 1;
                    tracing::warn!(
                        path = %path.display(),
                        line = line_num,
                        request_id = %parsed.entry.request_id,
                        "user_id not found in log line"
                    );
                }
                stats.entries_parsed += 1;
                entries.push(parsed.entry);
            }
            Err(e) => {
                stats.malformed_lines += 1;
                tracing::warn!(
                    path = %path.display(),
                    line = line_num,
                    error = %e,
                    "skipping malformed log line"
                );
            }
        }
    }

    stats.files_processed = 1;
    tracing::debug!(
        path = %path.display(),
        lines = stats.lines_read,
        entries = stats.entries_parsed,
        "finished reading log file"
    );

    Ok(FileIngest {
        path: path.to_path_buf(),
        entries,
        stats,
    })
}
