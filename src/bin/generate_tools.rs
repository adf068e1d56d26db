//! Regenerates the catalog artifacts once.
//!
//! Runs with no arguments from anywhere inside the site checkout. Prints a
//! summary and every collected error to stderr, and exits non-zero when the
//! run fails for any reason.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use toolshelf::logging::{self, Verbosity};
use toolshelf::{Generator, GeneratorConfig, ROOT_ENV, resolve_project_root};

#[derive(Debug, Parser)]
#[command(
    name = "generate-tools",
    about = "Validate tools/*.json and regenerate the catalog artifacts"
)]
struct Cli {
    /// Project root containing tools/schema.json (discovered when omitted).
    #[arg(long, env = ROOT_ENV)]
    root: Option<PathBuf>,

    /// Only print warnings and errors.
    #[arg(short, long)]
    quiet: bool,

    /// Log per-file detail.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("Fatal error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.quiet, cli.verbose));

    let root = resolve_project_root(cli.root.as_deref())?;
    let generator = Generator::new(GeneratorConfig::for_root(root));
    let report = generator.run();

    if report.success {
        eprintln!("Generated {} tools", report.tool_count);
        return Ok(true);
    }

    eprintln!("Generation failed");
    for message in report.error_messages() {
        eprintln!("  - {message}");
    }
    Ok(false)
}
