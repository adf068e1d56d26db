//! Build-tool integration.
//!
//! Two triggers wrap the generator. `build_start` is the cold-build hook and
//! turns a failed run into an error so the host build aborts.
//! `handle_changes` is the dev-server hook: it regenerates when a tool file
//! changes, asks connected clients for a full reload on success, and only
//! logs on failure so the server keeps running.

use crate::generate::{GenerateReport, Generator};
use anyhow::{Result, bail};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use tracing::{debug, error, info};

/// Message pushed to connected browser clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReloadSignal {
    FullReload { path: String },
}

impl ReloadSignal {
    pub fn full_reload() -> Self {
        ReloadSignal::FullReload {
            path: "*".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// None of the changed paths are tool inputs.
    Ignored,
    Regenerated { tool_count: usize },
    Failed { message: String },
}

pub struct ToolsPlugin {
    generator: Arc<Generator>,
    reload: Sender<ReloadSignal>,
}

impl ToolsPlugin {
    pub fn new(generator: Arc<Generator>, reload: Sender<ReloadSignal>) -> Self {
        Self { generator, reload }
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Generate once; any failure is returned for the host to abort on.
    pub fn build_start(&self) -> Result<GenerateReport> {
        let report = self.generator.run();
        if !report.success {
            bail!("Tool generation failed:\n{}", joined(&report, "\n"));
        }
        info!("[tools] Generated {} tools", report.tool_count);
        Ok(report)
    }

    pub fn handle_change(&self, path: &Path) -> ChangeOutcome {
        self.handle_changes(&[path.to_path_buf()])
    }

    /// Regenerate once for a batch of changed paths.
    pub fn handle_changes(&self, paths: &[PathBuf]) -> ChangeOutcome {
        let config = self.generator.config();
        if !paths.iter().any(|path| config.is_tool_input(path)) {
            debug!(?paths, "ignoring changes outside the tools directory");
            return ChangeOutcome::Ignored;
        }

        info!("[tools] Regenerating...");
        let report = self.generator.run();
        if report.success {
            info!("[tools] Generated {} tools", report.tool_count);
            if self.reload.send(ReloadSignal::full_reload()).is_err() {
                debug!("no reload listener attached");
            }
            ChangeOutcome::Regenerated {
                tool_count: report.tool_count,
            }
        } else {
            let message = joined(&report, ", ");
            error!("[tools] Generation failed: {message}");
            ChangeOutcome::Failed { message }
        }
    }
}

fn joined(report: &GenerateReport, separator: &str) -> String {
    if report.errors.is_empty() {
        return "Unknown error".to_string();
    }
    report.error_messages().join(separator)
}
