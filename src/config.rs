//! Project layout for a generation run.
//!
//! Every path is relative to the project root so the same configuration works
//! from the CLI, the watcher, and tests that build a project in a temp dir.

use crate::schema::TypegenOptions;
use std::path::{Path, PathBuf};

pub const DEFAULT_TOOLS_DIR: &str = "tools";
pub const DEFAULT_SCHEMA_FILE: &str = "schema.json";
pub const DEFAULT_TYPES_OUTPUT: &str = "src/types/tool.ts";
pub const DEFAULT_DATASET_OUTPUT: &str = "src/tools.json";
pub const DEFAULT_PUBLIC_SCHEMA_OUTPUT: &str = "public/schemas/tool-collection.json";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub root: PathBuf,
    pub tools_dir: PathBuf,
    /// File name of the schema inside `tools_dir`; never treated as a tool file.
    pub schema_file: String,
    pub types_output: PathBuf,
    pub dataset_output: PathBuf,
    pub public_schema_output: PathBuf,
    pub typegen: TypegenOptions,
}

impl GeneratorConfig {
    /// The standard layout anchored at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tools_dir: PathBuf::from(DEFAULT_TOOLS_DIR),
            schema_file: DEFAULT_SCHEMA_FILE.to_string(),
            types_output: PathBuf::from(DEFAULT_TYPES_OUTPUT),
            dataset_output: PathBuf::from(DEFAULT_DATASET_OUTPUT),
            public_schema_output: PathBuf::from(DEFAULT_PUBLIC_SCHEMA_OUTPUT),
            typegen: TypegenOptions::default(),
        }
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.resolve(&self.tools_dir)
    }

    pub fn schema_path(&self) -> PathBuf {
        self.tools_dir().join(&self.schema_file)
    }

    pub fn types_path(&self) -> PathBuf {
        self.resolve(&self.types_output)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.resolve(&self.dataset_output)
    }

    pub fn public_schema_path(&self) -> PathBuf {
        self.resolve(&self.public_schema_output)
    }

    /// Whether a changed path belongs to the watched tool inputs.
    pub fn is_tool_input(&self, path: &Path) -> bool {
        let tools_dir = self.tools_dir();
        let absolute = self.resolve(path);
        absolute.parent() == Some(tools_dir.as_path())
            && absolute.extension().and_then(|ext| ext.to_str()) == Some("json")
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
