use indexmap::IndexMap;

use crate::event::LogEntry;

/// Bucket for entries that carry no request id
pub const ORPHANS_KEY: &str = "orphans";

/// Entries grouped by request id, each group in encounter order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelatedGroups {
    groups: IndexMap<String, Vec<LogEntry>>,
}

impl CorrelatedGroups {
    pub fn get(&self, request_id: &str) -> Option<&[LogEntry]> {
        self.groups.get(request_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[LogEntry])> {
        self.groups
            .iter()
            .map(|(id, entries)| (id.as_str(), entries.as_slice()))
    }

    /// Number of distinct request ids, orphans included
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_entries(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Group entries by request id in one pass. Nothing is dropped: entries
/// without an id land under [`ORPHANS_KEY`].
pub fn correlate(entries: &[LogEntry]) -> CorrelatedGroups {
    let mut groups: IndexMap<String, Vec<LogEntry>> = IndexMap::new();

    for entry in entries {
        let key = if entry.has_request_id() {
            entry.request_id.as_str()
        } else {
            ORPHANS_KEY
        };

        match groups.get_mut(key) {
            Some(group) => group.push(entry.clone()),
            None => {
                groups.insert(key.to_string(), vec![entry.clone()]);
            }
        }
    }

    CorrelatedGroups { groups }
}
