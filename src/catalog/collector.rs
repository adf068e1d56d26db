//! Discovers tool files and pulls validated entries out of them.
//!
//! Problems are recorded per file and collection moves on to the next file,
//! so one run reports every broken file. Files are visited in sorted order:
//! which of two clashing names counts as the duplicate depends on it.

use crate::catalog::model::{EntryOrigin, ToolEntry};
use crate::issues::GenerationIssue;
use crate::schema::{ToolValidator, Violation};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Editor hint pointing at the schema; not part of a collection.
pub const SCHEMA_HINT_KEY: &str = "$schema";

/// Entries gathered from every file that passed validation, plus the issues
/// recorded for the files that did not.
#[derive(Debug, Default)]
pub struct CollectedEntries {
    pub entries: Vec<ToolEntry>,
    pub issues: Vec<GenerationIssue>,
}

/// List `*.json` files directly inside `tools_dir`, skipping the schema.
///
/// A missing directory yields an empty list; the caller decides that no
/// input at all is fatal.
pub fn discover_tool_files(tools_dir: &Path, schema_file_name: &str) -> Result<Vec<PathBuf>> {
    if !tools_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(tools_dir)
        .with_context(|| format!("listing tool files in {}", tools_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        if path.file_name().and_then(|name| name.to_str()) == Some(schema_file_name) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Read, parse, and validate each file in order, extracting its entries.
///
/// `display_root` only shortens paths in messages (`tools/cli.json`).
pub fn collect_entries(
    files: &[PathBuf],
    display_root: &Path,
    validator: &ToolValidator,
) -> CollectedEntries {
    let mut collected = CollectedEntries::default();
    for path in files {
        let file = display_path(path, display_root);
        match load_collection(path, &file, validator) {
            Ok(entries) => {
                debug!(file = %file.display(), entries = entries.len(), "collected tool file");
                collected.entries.extend(entries);
            }
            Err(issue) => {
                debug!(file = %file.display(), kind = issue.kind(), "rejected tool file");
                collected.issues.push(issue);
            }
        }
    }
    collected
}

fn load_collection(
    path: &Path,
    file: &Path,
    validator: &ToolValidator,
) -> Result<Vec<ToolEntry>, GenerationIssue> {
    let data = fs::read_to_string(path).map_err(|err| GenerationIssue::Unreadable {
        file: file.to_path_buf(),
        message: err.to_string(),
    })?;
    let mut value: Value = serde_json::from_str(&data).map_err(|err| GenerationIssue::Parse {
        file: file.to_path_buf(),
        message: err.to_string(),
    })?;

    strip_schema_hint(&mut value);

    validator
        .validate(&value)
        .map_err(|violations| GenerationIssue::Validation {
            file: file.to_path_buf(),
            violations,
        })?;

    extract_entries(value, file)
}

/// Remove the top-level `$schema` editor hint, if any.
pub fn strip_schema_hint(value: &mut Value) {
    if let Some(object) = value.as_object_mut() {
        object.shift_remove(SCHEMA_HINT_KEY);
    }
}

// Only reachable when the schema itself admits another shape.
fn extract_entries(mut value: Value, file: &Path) -> Result<Vec<ToolEntry>, GenerationIssue> {
    let invalid = |path: String, message: &str| GenerationIssue::Validation {
        file: file.to_path_buf(),
        violations: vec![Violation {
            path,
            message: message.to_string(),
        }],
    };

    let Some(Value::Array(items)) = value.get_mut("tools").map(Value::take) else {
        return Err(invalid("/tools".to_string(), "expected an array of tool entries"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let origin = EntryOrigin {
                file: file.to_path_buf(),
                index,
            };
            ToolEntry::from_value(origin, item).ok_or_else(|| {
                invalid(
                    format!("/tools/{index}"),
                    "entry must be an object with a string \"name\"",
                )
            })
        })
        .collect()
}

fn display_path(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn validator() -> ToolValidator {
        ToolValidator::compile(&json!({
            "type": "object",
            "required": ["tools"],
            "additionalProperties": false,
            "properties": {
                "tools": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["name", "categories"],
                        "properties": {
                            "name": {"type": "string", "minLength": 1},
                            "categories": {"type": "array", "minItems": 1, "items": {"type": "string"}}
                        }
                    }
                }
            }
        }))
        .expect("fixture schema compiles")
    }

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn discovery_skips_schema_non_json_and_subdirectories() -> Result<()> {
        let temp = TempDir::new()?;
        write(temp.path(), "schema.json", "{}");
        write(temp.path(), "b.json", "{}");
        write(temp.path(), "a.json", "{}");
        write(temp.path(), "notes.md", "");
        fs::create_dir(temp.path().join("nested.json"))?;

        let files = discover_tool_files(temp.path(), "schema.json")?;
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
        Ok(())
    }

    #[test]
    fn discovery_of_missing_directory_is_empty() -> Result<()> {
        let temp = TempDir::new()?;
        let files = discover_tool_files(&temp.path().join("tools"), "schema.json")?;
        assert!(files.is_empty());
        Ok(())
    }

    #[test]
    fn bad_files_are_reported_and_good_files_still_collected() -> Result<()> {
        let temp = TempDir::new()?;
        let broken = write(temp.path(), "a.json", "{\"tools\": [");
        let empty_categories = write(
            temp.path(),
            "b.json",
            r#"{"tools": [{"name": "jq", "categories": []}]}"#,
        );
        let good = write(
            temp.path(),
            "c.json",
            r#"{"tools": [{"name": "fd", "categories": ["files"]}, {"name": "bat", "categories": ["files"]}]}"#,
        );

        let collected = collect_entries(&[broken, empty_categories, good], temp.path(), &validator());

        let names: Vec<&str> = collected.entries.iter().map(ToolEntry::name).collect();
        assert_eq!(names, vec!["fd", "bat"]);
        assert_eq!(collected.entries[1].origin.to_string(), "c.json[1]");

        assert_eq!(collected.issues.len(), 2);
        assert_eq!(collected.issues[0].kind(), "parse");
        assert!(collected.issues[0].to_string().starts_with("a.json: JSON parse error - "));
        let GenerationIssue::Validation { file, violations } = &collected.issues[1] else {
            panic!("expected validation issue, got {:?}", collected.issues[1]);
        };
        assert_eq!(file, Path::new("b.json"));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "/tools/0/categories");
        Ok(())
    }

    #[test]
    fn schema_hint_is_removed_before_validation() -> Result<()> {
        let temp = TempDir::new()?;
        let file = write(
            temp.path(),
            "a.json",
            r#"{"$schema": "../public/schemas/tool-collection.json", "tools": [{"name": "fd", "categories": ["files"]}]}"#,
        );
        let collected = collect_entries(&[file], temp.path(), &validator());
        assert!(collected.issues.is_empty(), "{:?}", collected.issues);
        assert_eq!(collected.entries.len(), 1);
        assert!(!collected.entries[0].fields().contains_key(SCHEMA_HINT_KEY));
        Ok(())
    }

    #[test]
    fn strip_schema_hint_ignores_non_objects() {
        let mut value = json!(["$schema"]);
        strip_schema_hint(&mut value);
        assert_eq!(value, json!(["$schema"]));
    }
}
