use indexmap::IndexSet;

use super::correlate::CorrelatedGroups;

const ERROR_LEVEL: &str = "ERROR";
const WARN_LEVEL: &str = "WARN";

/// Request ids with at least one failing entry. Enumeration order is not meaningful.
pub type FailedRequests = IndexSet<String>;

/// Case-sensitive substring match, so `WARNING` and `SUPERERROR` both count
pub fn is_failing_level(level: &str) -> bool {
    level.contains(ERROR_LEVEL) || level.contains(WARN_LEVEL)
}

pub fn detect_failed_requests(groups: &CorrelatedGroups) -> FailedRequests {
    groups
        .iter()
        .filter(|(_, entries)| entries.iter().any(|e| is_failing_level(&e.level)))
        .map(|(id, _)| id.to_string())
        .collect()
}
