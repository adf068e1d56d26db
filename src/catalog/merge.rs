//! Merges collected entries into the published catalog.
//!
//! Names are unique ignoring case across every file. The first declaration in
//! file order is kept and each later clash is reported; any clash fails the
//! run, so dropping the later entry only keeps the report readable.

use crate::catalog::collate::compare_names;
use crate::catalog::model::{EntryOrigin, ToolEntry};
use crate::issues::GenerationIssue;
use serde::Serialize;
use std::collections::HashMap;

/// Entries accepted by the merge, sorted in catalog order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MergedCatalog {
    entries: Vec<ToolEntry>,
}

impl MergedCatalog {
    pub fn entries(&self) -> &[ToolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(ToolEntry::name)
    }
}

/// Outcome of deduplicating entries; `catalog` is only sorted when no
/// duplicates were found.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub catalog: MergedCatalog,
    pub issues: Vec<GenerationIssue>,
}

/// Deduplicate `entries` in the order given, then sort when clean.
pub fn merge_entries(entries: Vec<ToolEntry>) -> MergeOutcome {
    let mut seen: HashMap<String, EntryOrigin> = HashMap::new();
    let mut accepted = Vec::with_capacity(entries.len());
    let mut issues = Vec::new();

    for entry in entries {
        let key = entry.name_key();
        if let Some(first) = seen.get(&key) {
            issues.push(GenerationIssue::DuplicateName {
                file: entry.origin.file.clone(),
                index: entry.origin.index,
                name: entry.name().to_string(),
                first_file: first.file.clone(),
                first_index: first.index,
            });
            continue;
        }
        seen.insert(key, entry.origin.clone());
        accepted.push(entry);
    }

    if issues.is_empty() {
        sort_catalog(&mut accepted);
    }

    MergeOutcome {
        catalog: MergedCatalog { entries: accepted },
        issues,
    }
}

/// Stable sort by name in catalog order.
pub fn sort_catalog(entries: &mut [ToolEntry]) {
    entries.sort_by(|a, b| compare_names(a.name(), b.name()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn entry(file: &str, index: usize, name: &str) -> ToolEntry {
        ToolEntry::from_value(
            EntryOrigin {
                file: PathBuf::from(file),
                index,
            },
            json!({"name": name}),
        )
        .expect("fixture entry")
    }

    #[test]
    fn sorts_entries_across_files() {
        let outcome = merge_entries(vec![entry("a.json", 0, "Zed"), entry("b.json", 0, "Alpha")]);
        assert!(outcome.issues.is_empty());
        assert_eq!(outcome.catalog.names().collect::<Vec<_>>(), vec!["Alpha", "Zed"]);
    }

    #[test]
    fn first_occurrence_wins_and_later_clashes_are_reported() {
        let outcome = merge_entries(vec![
            entry("a.json", 0, "Tool"),
            entry("b.json", 0, "TOOL"),
            entry("b.json", 1, "tool"),
            entry("b.json", 2, "Other"),
        ]);
        assert_eq!(outcome.issues.len(), 2);
        assert_eq!(
            outcome.issues[0].to_string(),
            "b.json[0]: Duplicate tool name \"TOOL\" (first declared at a.json[0])"
        );
        assert_eq!(
            outcome.issues[1].to_string(),
            "b.json[1]: Duplicate tool name \"tool\" (first declared at a.json[0])"
        );
        assert_eq!(outcome.catalog.names().collect::<Vec<_>>(), vec!["Tool", "Other"]);
    }

    #[test]
    fn duplicates_within_one_file_are_caught() {
        let outcome = merge_entries(vec![entry("a.json", 0, "fd"), entry("a.json", 1, "FD")]);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].kind(), "duplicate_name");
    }

    #[test]
    fn serializes_as_a_plain_array() {
        let outcome = merge_entries(vec![entry("a.json", 0, "b"), entry("a.json", 1, "a")]);
        assert_eq!(
            serde_json::to_value(&outcome.catalog).unwrap(),
            json!([{"name": "a"}, {"name": "b"}])
        );
    }
}
