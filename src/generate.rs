//! The generation run: schema, validation, merge, and artifacts in one pass.
//!
//! A run never panics or returns an error to its caller. Per-file problems
//! and duplicates are aggregated into the report; anything unexpected is
//! folded into a single fatal issue. Artifacts are only written by a run with
//! no issues at all.

use crate::artifacts::{Artifact, ArtifactRecord, render_dataset, write_artifacts};
use crate::catalog::{collect_entries, discover_tool_files, merge_entries};
use crate::config::GeneratorConfig;
use crate::issues::GenerationIssue;
use crate::schema::ToolSchema;
use anyhow::Result;
use std::sync::Mutex;
use tracing::{debug, error, info};

/// What a single run produced.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub success: bool,
    /// Entries accepted by the merge (the published count on success).
    pub tool_count: usize,
    /// Tool files discovered, valid or not.
    pub files_found: usize,
    pub errors: Vec<GenerationIssue>,
    /// Empty unless the run succeeded.
    pub artifacts: Vec<ArtifactRecord>,
}

impl GenerateReport {
    fn failed(tool_count: usize, files_found: usize, errors: Vec<GenerationIssue>) -> Self {
        Self {
            success: false,
            tool_count,
            files_found,
            errors,
            artifacts: Vec::new(),
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Run the pipeline once against `config`.
pub fn generate_tools(config: &GeneratorConfig) -> GenerateReport {
    info!("Generating tools...");
    match run_pipeline(config) {
        Ok(report) => report,
        Err(err) => {
            error!("generation aborted: {err:#}");
            GenerateReport::failed(0, 0, vec![GenerationIssue::fatal(&err)])
        }
    }
}

fn run_pipeline(config: &GeneratorConfig) -> Result<GenerateReport> {
    let schema = ToolSchema::load(&config.schema_path())?;
    let validator = schema.validator()?;

    let files = discover_tool_files(&config.tools_dir(), &config.schema_file)?;
    if files.is_empty() {
        return Ok(GenerateReport::failed(
            0,
            0,
            vec![GenerationIssue::NoToolFiles {
                dir: config.tools_dir.clone(),
            }],
        ));
    }
    info!("Found {} tool file(s)", files.len());

    let collected = collect_entries(&files, &config.root, &validator);
    let mut errors = collected.issues;
    let merged = merge_entries(collected.entries);
    errors.extend(merged.issues);

    if !errors.is_empty() {
        debug!(errors = errors.len(), "skipping artifacts");
        return Ok(GenerateReport::failed(
            merged.catalog.len(),
            files.len(),
            errors,
        ));
    }

    let types = schema.derive_entry_type(&config.typegen)?;
    let dataset = render_dataset(&merged.catalog)?;
    let artifacts = write_artifacts(&[
        Artifact::new(config.types_path(), types),
        Artifact::new(config.dataset_path(), dataset),
        Artifact::new(config.public_schema_path(), schema.source()),
    ])?;

    info!("Generated {} tools", merged.catalog.len());
    Ok(GenerateReport {
        success: true,
        tool_count: merged.catalog.len(),
        files_found: files.len(),
        errors: Vec::new(),
        artifacts,
    })
}

/// Serializes runs that share one set of output files.
///
/// The build-start hook and the file-change hook may fire close together;
/// holding the lock for a whole run keeps their writes from interleaving.
pub struct Generator {
    config: GeneratorConfig,
    lock: Mutex<()>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn run(&self) -> GenerateReport {
        let _guard = self.lock.lock().unwrap_or_else(|err| err.into_inner());
        generate_tools(&self.config)
    }
}
