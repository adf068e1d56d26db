//! Writes the generated files the UI consumes.
//!
//! All artifacts are staged into temp files beside their targets before any
//! of them is renamed into place, so a failure while staging leaves every
//! previous artifact untouched. A failure while renaming restores the
//! targets already replaced. Files whose bytes already match are skipped,
//! which keeps repeat runs from waking the dev server's watcher.

use crate::catalog::MergedCatalog;
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// One file to produce.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

/// The merged catalog as a two-space pretty JSON array with a final newline.
pub fn render_dataset(catalog: &MergedCatalog) -> Result<String> {
    let mut rendered =
        serde_json::to_string_pretty(catalog).context("serializing merged catalog")?;
    rendered.push('\n');
    Ok(rendered)
}

/// A staged artifact and whatever it is about to replace.
struct Staged {
    path: PathBuf,
    temp: NamedTempFile,
    previous: Option<Vec<u8>>,
}

/// Stage every artifact, then move them all into place.
///
/// If a rename fails, targets already replaced in this call are put back to
/// their previous contents (or removed if they did not exist).
pub fn write_artifacts(artifacts: &[Artifact]) -> Result<Vec<ArtifactRecord>> {
    let mut staged = Vec::new();
    let mut records = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let previous = fs::read(&artifact.path).ok();
        if previous.as_deref() == Some(artifact.contents.as_slice()) {
            debug!(path = %artifact.path.display(), "artifact unchanged");
            records.push(ArtifactRecord {
                path: artifact.path.clone(),
                outcome: WriteOutcome::Unchanged,
            });
            continue;
        }
        staged.push(Staged {
            path: artifact.path.clone(),
            temp: stage(artifact)?,
            previous,
        });
        records.push(ArtifactRecord {
            path: artifact.path.clone(),
            outcome: WriteOutcome::Written,
        });
    }

    let mut replaced: Vec<(PathBuf, Option<Vec<u8>>)> = Vec::with_capacity(staged.len());
    for Staged {
        path,
        temp,
        previous,
    } in staged
    {
        if let Err(err) = temp.persist(&path) {
            restore(replaced);
            return Err(err.error)
                .with_context(|| format!("moving generated file into {}", path.display()));
        }
        debug!(path = %path.display(), "artifact written");
        replaced.push((path, previous));
    }

    Ok(records)
}

fn restore(replaced: Vec<(PathBuf, Option<Vec<u8>>)>) {
    for (path, previous) in replaced.into_iter().rev() {
        let outcome = match previous {
            Some(bytes) => fs::write(&path, bytes),
            None => fs::remove_file(&path),
        };
        match outcome {
            Ok(()) => debug!(path = %path.display(), "artifact restored"),
            Err(err) => warn!(path = %path.display(), "unable to restore artifact: {err}"),
        }
    }
}

fn stage(artifact: &Artifact) -> Result<NamedTempFile> {
    let parent = artifact
        .path
        .parent()
        .ok_or_else(|| anyhow!("{} has no parent directory", artifact.path.display()))?;
    fs::create_dir_all(parent)
        .with_context(|| format!("creating output directory {}", parent.display()))?;

    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("staging {}", artifact.path.display()))?;
    temp.write_all(&artifact.contents)
        .with_context(|| format!("staging {}", artifact.path.display()))?;
    temp.flush()?;

    // Temp files are created owner-only; generated files are served.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    Ok(temp)
}
