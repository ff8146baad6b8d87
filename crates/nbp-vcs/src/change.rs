// change.rs: Working-tree change entries and the ordered change set.
//
// A ChangeSet is produced once per run from the backend's status output
// and is read-only afterwards. Paths are unique; order is detection order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How a path differs from the last committed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Modified,
    Added,
    Deleted,
    Untracked,
    Renamed,
}

impl ChangeStatus {
    /// Single-letter code used in the run report.
    pub fn code(self) -> char {
        match self {
            ChangeStatus::Modified => 'M',
            ChangeStatus::Added => 'A',
            ChangeStatus::Deleted => 'D',
            ChangeStatus::Untracked => '?',
            ChangeStatus::Renamed => 'R',
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeStatus::Modified => "modified",
            ChangeStatus::Added => "added",
            ChangeStatus::Deleted => "deleted",
            ChangeStatus::Untracked => "untracked",
            ChangeStatus::Renamed => "renamed",
        };
        f.write_str(label)
    }
}

/// One changed path in the working tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Path relative to the repository root.
    pub path: String,

    pub status: ChangeStatus,

    /// Previous path, set only for renames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
}

impl ChangeEntry {
    pub fn new(path: impl Into<String>, status: ChangeStatus) -> Self {
        Self {
            path: path.into(),
            status,
            original_path: None,
        }
    }

    pub fn renamed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: to.into(),
            status: ChangeStatus::Renamed,
            original_path: Some(from.into()),
        }
    }
}

/// Ordered, duplicate-free sequence of change entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    entries: Vec<ChangeEntry>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Returns false (and keeps the first entry) when the
    /// path is already present.
    pub fn push(&mut self, entry: ChangeEntry) -> bool {
        if self.entries.iter().any(|e| e.path == entry.path) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    /// Every path that must be staged for this set, renames contributing
    /// both their old and new path. Order follows the entries.
    pub fn staging_paths(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut paths = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if let Some(orig) = entry.original_path.as_deref() {
                if seen.insert(orig) {
                    paths.push(orig);
                }
            }
            if seen.insert(entry.path.as_str()) {
                paths.push(entry.path.as_str());
            }
        }
        paths
    }

    /// Parse `git status --porcelain=v1 -z` output.
    ///
    /// Records are NUL-terminated `XY <path>`; renames and copies are
    /// followed by an extra record holding the source path.
    pub fn from_porcelain_z(output: &str) -> Self {
        let mut set = ChangeSet::new();
        let mut records = output.split('\0').filter(|r| !r.is_empty());

        while let Some(record) = records.next() {
            if record.len() < 4 || !record.is_char_boundary(3) {
                tracing::debug!("skipping malformed status record: {:?}", record);
                continue;
            }
            let mut code = record.chars();
            let x = code.next().unwrap_or(' ');
            let y = code.next().unwrap_or(' ');
            let path = &record[3..];

            let entry = match (x, y) {
                ('?', '?') => ChangeEntry::new(path, ChangeStatus::Untracked),
                ('!', '!') => continue,
                ('R', _) | (_, 'R') => match records.next() {
                    Some(orig) => ChangeEntry::renamed(orig, path),
                    None => ChangeEntry::new(path, ChangeStatus::Renamed),
                },
                ('C', _) | (_, 'C') => {
                    // Copy source is unchanged; only the new path matters.
                    records.next();
                    ChangeEntry::new(path, ChangeStatus::Added)
                }
                ('A', _) => ChangeEntry::new(path, ChangeStatus::Added),
                ('D', _) | (_, 'D') => ChangeEntry::new(path, ChangeStatus::Deleted),
                _ => ChangeEntry::new(path, ChangeStatus::Modified),
            };
            set.push(entry);
        }

        set
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a ChangeEntry;
    type IntoIter = std::slice::Iter<'a, ChangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<ChangeEntry> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = ChangeEntry>>(iter: I) -> Self {
        let mut set = ChangeSet::new();
        for entry in iter {
            set.push(entry);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_status_kind() {
        let out = " M src/lib.rs\0A  new.txt\0 D gone.txt\0?? notes.ipynb\0R  after.md\0before.md\0";
        let set = ChangeSet::from_porcelain_z(out);

        let got: Vec<(&str, ChangeStatus)> =
            set.iter().map(|e| (e.path.as_str(), e.status)).collect();
        assert_eq!(
            got,
            vec![
                ("src/lib.rs", ChangeStatus::Modified),
                ("new.txt", ChangeStatus::Added),
                ("gone.txt", ChangeStatus::Deleted),
                ("notes.ipynb", ChangeStatus::Untracked),
                ("after.md", ChangeStatus::Renamed),
            ]
        );
        assert_eq!(set.entries()[4].original_path.as_deref(), Some("before.md"));
    }

    #[test]
    fn paths_with_spaces_survive() {
        let set = ChangeSet::from_porcelain_z("?? data/raw prices.csv\0");
        assert_eq!(set.entries()[0].path, "data/raw prices.csv");
    }

    #[test]
    fn empty_output_is_empty_set() {
        assert!(ChangeSet::from_porcelain_z("").is_empty());
    }

    #[test]
    fn duplicate_paths_keep_first_entry() {
        let mut set = ChangeSet::new();
        assert!(set.push(ChangeEntry::new("a.txt", ChangeStatus::Modified)));
        assert!(!set.push(ChangeEntry::new("a.txt", ChangeStatus::Deleted)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.entries()[0].status, ChangeStatus::Modified);
    }

    #[test]
    fn staging_paths_include_rename_source() {
        let set: ChangeSet = vec![
            ChangeEntry::new("a.txt", ChangeStatus::Modified),
            ChangeEntry::renamed("old.ipynb", "new.ipynb"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.staging_paths(), vec!["a.txt", "old.ipynb", "new.ipynb"]);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let set = ChangeSet::from_porcelain_z("M\0 M ok.txt\0");
        assert_eq!(set.len(), 1);
        assert_eq!(set.entries()[0].path, "ok.txt");
    }
}
