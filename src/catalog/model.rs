//! Catalog entries as they move through the pipeline.
//!
//! Entries stay JSON objects: the schema owns their shape, and the only field
//! code reads is `name`. Each one remembers where it came from so duplicate
//! reports can point at a file and index.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// File and position an entry was declared at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOrigin {
    pub file: PathBuf,
    pub index: usize,
}

impl fmt::Display for EntryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.file.display(), self.index)
    }
}

/// One tool record plus its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolEntry {
    pub origin: EntryOrigin,
    name: String,
    fields: Map<String, Value>,
}

impl ToolEntry {
    /// Wrap a validated entry object. Returns `None` when the value is not an
    /// object with a string `name`, which the schema rules out.
    pub fn from_value(origin: EntryOrigin, value: Value) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        let name = fields.get("name")?.as_str()?.to_string();
        Some(Self {
            origin,
            name,
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key used for the case-insensitive uniqueness rule.
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// The entry object as authored.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Serialize for ToolEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn origin() -> EntryOrigin {
        EntryOrigin {
            file: PathBuf::from("tools/cli.json"),
            index: 3,
        }
    }

    #[test]
    fn serializes_fields_in_authored_order() {
        let entry = ToolEntry::from_value(
            origin(),
            json!({"name": "jq", "github": "https://github.com/jqlang/jq", "categories": ["json"]}),
        )
        .expect("object with name");
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"name":"jq","github":"https://github.com/jqlang/jq","categories":["json"]}"#
        );
    }

    #[test]
    fn name_key_folds_case() {
        let entry = ToolEntry::from_value(origin(), json!({"name": "RipGrep"})).unwrap();
        assert_eq!(entry.name(), "RipGrep");
        assert_eq!(entry.name_key(), "ripgrep");
    }

    #[test]
    fn rejects_values_without_a_string_name() {
        assert!(ToolEntry::from_value(origin(), json!({"name": 7})).is_none());
        assert!(ToolEntry::from_value(origin(), json!(["jq"])).is_none());
    }

    #[test]
    fn origin_displays_as_file_and_index() {
        assert_eq!(origin().to_string(), "tools/cli.json[3]");
    }
}
