//! Polling watcher for the tools directory.
//!
//! Stands in for a dev server's file watcher: it fingerprints every JSON file
//! directly under `tools/` and reports what changed since the last poll.
//! Everything seen in one poll is handed to the plugin as a single batch, so a
//! burst of saves costs one regeneration.

use crate::hooks::ToolsPlugin;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

pub struct ToolWatcher {
    tools_dir: PathBuf,
    known: BTreeMap<PathBuf, Fingerprint>,
}

impl ToolWatcher {
    /// Start watching from the directory's current state.
    pub fn new(tools_dir: impl Into<PathBuf>) -> Result<Self> {
        let tools_dir = tools_dir.into();
        let known = snapshot(&tools_dir)?;
        Ok(Self { tools_dir, known })
    }

    pub fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }

    /// Paths added, removed, or modified since the previous poll, sorted.
    pub fn poll(&mut self) -> Result<Vec<PathBuf>> {
        let current = snapshot(&self.tools_dir)?;
        let mut changed: Vec<PathBuf> = current
            .iter()
            .filter(|(path, print)| self.known.get(*path) != Some(*print))
            .map(|(path, _)| path.clone())
            .collect();
        changed.extend(
            self.known
                .keys()
                .filter(|path| !current.contains_key(*path))
                .cloned(),
        );
        changed.sort();
        self.known = current;
        Ok(changed)
    }
}

fn snapshot(dir: &Path) -> Result<BTreeMap<PathBuf, Fingerprint>> {
    let mut prints = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(prints);
    }
    for entry in fs::read_dir(dir).with_context(|| format!("watching {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            // Removed between listing and stat; the next poll settles it.
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        prints.insert(
            path,
            Fingerprint {
                len: meta.len(),
                modified: meta.modified().ok(),
            },
        );
    }
    Ok(prints)
}

/// Poll until `stop` is set, regenerating through `plugin` on every change.
///
/// Poll failures are logged and retried; the loop itself never fails.
pub fn watch_loop(
    plugin: &ToolsPlugin,
    watcher: &mut ToolWatcher,
    interval: Duration,
    stop: &AtomicBool,
) {
    while !stop.load(Ordering::SeqCst) {
        thread::sleep(interval);
        match watcher.poll() {
            Ok(changed) if changed.is_empty() => {}
            Ok(changed) => {
                debug!(?changed, "tool files changed");
                plugin.handle_changes(&changed);
            }
            Err(err) => warn!("polling {} failed: {err:#}", watcher.tools_dir().display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reports_added_modified_and_removed_files() -> Result<()> {
        let temp = TempDir::new()?;
        let dir = temp.path();
        fs::write(dir.join("a.json"), "{}")?;
        fs::write(dir.join("b.json"), "{}")?;
        fs::write(dir.join("notes.txt"), "x")?;

        let mut watcher = ToolWatcher::new(dir)?;
        assert!(watcher.poll()?.is_empty());

        fs::write(dir.join("a.json"), "{\"tools\": []}")?;
        fs::remove_file(dir.join("b.json"))?;
        fs::write(dir.join("c.json"), "{}")?;
        fs::write(dir.join("notes.txt"), "changed")?;

        let changed = watcher.poll()?;
        assert_eq!(
            changed,
            vec![dir.join("a.json"), dir.join("b.json"), dir.join("c.json")]
        );
        assert!(watcher.poll()?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_directory_is_watched_as_empty() -> Result<()> {
        let temp = TempDir::new()?;
        let dir = temp.path().join("tools");
        let mut watcher = ToolWatcher::new(&dir)?;
        fs::create_dir(&dir)?;
        fs::write(dir.join("a.json"), "{}")?;
        assert_eq!(watcher.poll()?, vec![dir.join("a.json")]);
        Ok(())
    }
}
