#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use toolshelf::GeneratorConfig;

/// The schema shipped in this repository's `tools/` directory.
pub const SHIPPED_SCHEMA: &str = include_str!("../../tools/schema.json");

pub fn shipped_tools_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tools")
}

/// A throwaway site checkout with `tools/schema.json` in place.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Result<Self> {
        Self::with_schema(SHIPPED_SCHEMA)
    }

    pub fn with_schema(schema: &str) -> Result<Self> {
        let dir = TempDir::new().context("allocating project dir")?;
        fs::create_dir_all(dir.path().join("tools"))?;
        fs::write(dir.path().join("tools/schema.json"), schema)?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig::for_root(self.root())
    }

    pub fn write_collection(&self, name: &str, tools: Vec<Value>) -> Result<PathBuf> {
        let body = serde_json::to_string_pretty(&json!({ "tools": tools }))?;
        self.write_raw(name, &body)
    }

    pub fn write_raw(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root().join("tools").join(name);
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Copy the repository's own tool files into the project.
    pub fn copy_shipped_tools(&self) -> Result<()> {
        for entry in fs::read_dir(shipped_tools_dir())? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                let name = path.file_name().context("tool file name")?;
                fs::copy(&path, self.root().join("tools").join(name))?;
            }
        }
        Ok(())
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.root().join(relative);
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root().join(relative).exists()
    }

    pub fn dataset_names(&self) -> Result<Vec<String>> {
        let dataset: Value = serde_json::from_str(&self.read("src/tools.json")?)?;
        Ok(dataset
            .as_array()
            .context("dataset is an array")?
            .iter()
            .filter_map(|entry| entry.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

/// A schema-valid entry named `name`.
pub fn tool(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} fixture"),
        "categories": ["cli"],
        "github": format!("https://github.com/example/{}", name.to_lowercase())
    })
}
