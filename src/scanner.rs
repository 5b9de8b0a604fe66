use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{AnalyzerError, Result};

const LOG_SUFFIX: &str = ".log";

/// Collect every non-directory entry under `dir` whose name ends in `.log`.
///
/// Symlinks are not followed. The result is sorted so runs over the same
/// tree dispatch files in the same order.
pub fn scan_log_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(AnalyzerError::Scan {
                    path: dir.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                tracing::warn!(
                    path = ?err.path(),
                    error = %err,
                    "skipping unreadable directory entry"
                );
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        if entry.file_name().to_string_lossy().ends_with(LOG_SUFFIX) {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    tracing::debug!(dir = %dir.display(), files = paths.len(), "scan finished");
    Ok(paths)
}
