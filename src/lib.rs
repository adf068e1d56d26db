//! Build-time generator for the toolshelf catalog site.
//!
//! Tool entries are hand-authored as JSON collections under `tools/` and
//! checked against `tools/schema.json`. A generation run validates every
//! collection, rejects case-insensitive duplicate names, and emits the
//! artifacts the UI imports: the sorted dataset (`src/tools.json`), the
//! `Tool` type declaration derived from the schema (`src/types/tool.ts`), and
//! a public copy of the schema for editors. The `hooks` and `watch` modules
//! wire runs into a cold build and a dev-server reload loop.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod artifacts;
pub mod catalog;
pub mod config;
pub mod generate;
pub mod hooks;
pub mod issues;
pub mod logging;
pub mod schema;
pub mod watch;

pub use artifacts::{ArtifactRecord, WriteOutcome};
pub use catalog::{EntryOrigin, MergedCatalog, ToolEntry};
pub use config::GeneratorConfig;
pub use generate::{GenerateReport, Generator, generate_tools};
pub use hooks::{ChangeOutcome, ReloadSignal, ToolsPlugin};
pub use issues::GenerationIssue;
pub use schema::{ToolSchema, ToolValidator, Violation};
pub use watch::ToolWatcher;

/// Environment variable naming the project root explicitly.
pub const ROOT_ENV: &str = "TOOLSHELF_ROOT";

const ROOT_SENTINEL: &str = "tools/schema.json";

/// Returns true when `candidate` looks like a catalog project root.
fn is_project_root(candidate: &Path) -> bool {
    candidate.join(ROOT_SENTINEL).is_file()
}

fn root_from_hint(hint: &Path) -> Option<PathBuf> {
    if hint.as_os_str().is_empty() || !is_project_root(hint) {
        return None;
    }
    fs::canonicalize(hint).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_project_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the project root.
///
/// An explicit `TOOLSHELF_ROOT` wins when it points at a project; otherwise
/// the search climbs from the working directory. Outside a checkout this
/// fails rather than guessing where to write.
pub fn find_project_root() -> Result<PathBuf> {
    if let Some(env_root) = env::var_os(ROOT_ENV) {
        if let Some(root) = root_from_hint(Path::new(&env_root)) {
            return Ok(root);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate a project root containing {ROOT_SENTINEL}. Run from the site checkout or set {ROOT_ENV}."
    );
}

/// Use `explicit` when given (it must contain `tools/schema.json`), else
/// discover the root.
pub fn resolve_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => match root_from_hint(path) {
            Some(root) => Ok(root),
            None => bail!("{} does not contain {ROOT_SENTINEL}", path.display()),
        },
        None => find_project_root(),
    }
}
