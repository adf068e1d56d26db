//! Problems surfaced by a generation run.
//!
//! Per-file and per-entry issues are collected rather than short-circuiting so
//! one run reports every broken tool file at once. The display strings are
//! what the CLI prints and what the build hooks forward to the host.

use crate::schema::Violation;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationIssue {
    /// The tool file could not be read from disk.
    #[error("{}: unable to read - {message}", .file.display())]
    Unreadable { file: PathBuf, message: String },

    /// The tool file is not well-formed JSON.
    #[error("{}: JSON parse error - {message}", .file.display())]
    Parse { file: PathBuf, message: String },

    /// The file parsed but does not match the collection schema.
    #[error("{}: Validation failed - {}", .file.display(), join_violations(.violations))]
    Validation {
        file: PathBuf,
        violations: Vec<Violation>,
    },

    /// A later entry reuses a name already accepted, ignoring case.
    #[error(
        "{}[{index}]: Duplicate tool name \"{name}\" (first declared at {}[{first_index}])",
        .file.display(),
        .first_file.display()
    )]
    DuplicateName {
        file: PathBuf,
        index: usize,
        name: String,
        first_file: PathBuf,
        first_index: usize,
    },

    #[error("No tool files found in {}/ directory", .dir.display())]
    NoToolFiles { dir: PathBuf },

    /// Anything unexpected: I/O on outputs, a broken schema, type derivation.
    #[error("Fatal error: {message}")]
    Fatal { message: String },
}

impl GenerationIssue {
    pub(crate) fn fatal(err: &anyhow::Error) -> Self {
        GenerationIssue::Fatal {
            message: format!("{err:#}"),
        }
    }

    /// Short machine-friendly label for the issue kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationIssue::Unreadable { .. } => "unreadable",
            GenerationIssue::Parse { .. } => "parse",
            GenerationIssue::Validation { .. } => "validation",
            GenerationIssue::DuplicateName { .. } => "duplicate_name",
            GenerationIssue::NoToolFiles { .. } => "no_tool_files",
            GenerationIssue::Fatal { .. } => "fatal",
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
