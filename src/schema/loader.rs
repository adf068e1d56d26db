//! Loads `tools/schema.json` and hands out its derived views.
//!
//! The raw text is kept alongside the parsed document because the public
//! schema copy must be byte-for-byte what the author wrote.

use crate::schema::strict;
use crate::schema::typegen::{self, TypegenOptions};
use crate::schema::validator::ToolValidator;
use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the per-entry sub-schema lives inside the collection schema.
pub const ENTRY_SCHEMA_POINTER: &str = "/properties/tools/items";

// Bounds `$ref` chains so a self-referencing alias cannot loop forever.
const MAX_REF_HOPS: usize = 32;

/// Controls how the schema document is vetted before use.
pub struct SchemaLoadOptions {
    /// Reject unknown keywords, unknown formats, and non-local `$ref`s.
    pub strict: bool,
}

impl Default for SchemaLoadOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// A parsed collection schema plus its verbatim source text.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    path: PathBuf,
    source: String,
    document: Value,
}

impl ToolSchema {
    /// Read, parse, and strictly vet the schema at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, SchemaLoadOptions::default())
    }

    pub fn load_with(path: &Path, options: SchemaLoadOptions) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("reading schema {}", path.display()))?;
        Self::from_source(path, source, options)
    }

    /// Build a schema from text already in memory; `path` is only used for
    /// messages.
    pub fn from_source(
        path: impl Into<PathBuf>,
        source: String,
        options: SchemaLoadOptions,
    ) -> Result<Self> {
        let path = path.into();
        let document: Value = serde_json::from_str(&source)
            .with_context(|| format!("parsing schema {}", path.display()))?;
        if !document.is_object() {
            bail!("schema {} must be a JSON object", path.display());
        }
        if options.strict {
            strict::check_schema(&document)
                .with_context(|| format!("schema {} failed strict checks", path.display()))?;
        }
        Ok(Self {
            path,
            source,
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The schema text exactly as read from disk.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Compile the runtime validator for whole collection documents.
    pub fn validator(&self) -> Result<ToolValidator> {
        ToolValidator::compile(&self.document)
            .with_context(|| format!("compiling schema {}", self.path.display()))
    }

    /// The per-entry sub-schema with local `$ref`s followed.
    pub fn entry_schema(&self) -> Result<&Value> {
        let items = self.document.pointer(ENTRY_SCHEMA_POINTER).ok_or_else(|| {
            anyhow!(
                "schema {} has no entry schema at {ENTRY_SCHEMA_POINTER}",
                self.path.display()
            )
        })?;
        resolve_local_ref(&self.document, items)
    }

    /// Render the generated type declaration for a single entry.
    pub fn derive_entry_type(&self, options: &TypegenOptions) -> Result<String> {
        typegen::derive_entry_type(self, options)
            .with_context(|| format!("deriving entry type from {}", self.path.display()))
    }
}

/// Follow `$ref`s that point into `root` until a concrete schema is reached.
///
/// Only same-document references (`#`, `#/json/pointer`) are followed; any
/// other target is an error because schemas are never fetched.
pub(crate) fn resolve_local_ref<'a>(root: &'a Value, mut schema: &'a Value) -> Result<&'a Value> {
    for _ in 0..MAX_REF_HOPS {
        let Some(reference) = schema.get("$ref").and_then(Value::as_str) else {
            return Ok(schema);
        };
        let Some(pointer) = reference.strip_prefix('#') else {
            bail!("external reference '{reference}' cannot be resolved offline");
        };
        schema = if pointer.is_empty() {
            root
        } else {
            root.pointer(pointer)
                .ok_or_else(|| anyhow!("reference '{reference}' does not resolve"))?
        };
    }
    bail!("reference chain longer than {MAX_REF_HOPS} hops")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_schema_follows_local_refs() -> Result<()> {
        let source = json!({
            "type": "object",
            "properties": {"tools": {"type": "array", "items": {"$ref": "#/definitions/tool"}}},
            "definitions": {"tool": {"type": "object", "properties": {"name": {"type": "string"}}}}
        })
        .to_string();
        let schema = ToolSchema::from_source("schema.json", source, SchemaLoadOptions::default())?;
        let entry = schema.entry_schema()?;
        assert_eq!(
            entry.pointer("/properties/name/type"),
            Some(&json!("string"))
        );
        Ok(())
    }

    #[test]
    fn remote_refs_are_refused() {
        let root = json!({"items": {"$ref": "https://example.com/tool.json"}});
        let err = resolve_local_ref(&root, &root["items"]).expect_err("remote ref must fail");
        assert!(err.to_string().contains("cannot be resolved offline"));
    }

    #[test]
    fn ref_cycles_are_bounded() {
        let root = json!({"definitions": {"a": {"$ref": "#/definitions/a"}}});
        let err = resolve_local_ref(&root, &root["definitions"]["a"]).expect_err("cycle");
        assert!(err.to_string().contains("hops"));
    }

    #[test]
    fn source_text_is_kept_verbatim() -> Result<()> {
        let source = "{\n    \"type\": \"object\"\n}\n".to_string();
        let schema =
            ToolSchema::from_source("schema.json", source.clone(), SchemaLoadOptions::default())?;
        assert_eq!(schema.source(), source);
        Ok(())
    }

    #[test]
    fn non_object_schema_is_rejected() {
        let err = ToolSchema::from_source("schema.json", "[]".to_string(), SchemaLoadOptions::default())
            .expect_err("array schema must fail");
        assert!(err.to_string().contains("must be a JSON object"));
    }
}
