//! Dev-server companion: regenerate on every tool file change.
//!
//! Performs the cold-build generation first and exits non-zero if it fails.
//! Afterwards it polls `tools/`, regenerates on change, and writes one JSON
//! reload message per successful run to stdout for the connected client.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use toolshelf::logging::{self, Verbosity};
use toolshelf::watch::watch_loop;
use toolshelf::{
    Generator, GeneratorConfig, ROOT_ENV, ReloadSignal, ToolWatcher, ToolsPlugin,
    resolve_project_root,
};

#[derive(Debug, Parser)]
#[command(
    name = "watch-tools",
    about = "Regenerate catalog artifacts whenever tools/*.json changes"
)]
struct Cli {
    /// Project root containing tools/schema.json (discovered when omitted).
    #[arg(long, env = ROOT_ENV)]
    root: Option<PathBuf>,

    /// Milliseconds between polls of the tools directory.
    #[arg(long, default_value_t = 250)]
    interval_ms: u64,

    /// Only print warnings and errors.
    #[arg(short, long)]
    quiet: bool,

    /// Log per-file detail.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.quiet, cli.verbose));

    let root = resolve_project_root(cli.root.as_deref())?;
    let generator = Arc::new(Generator::new(GeneratorConfig::for_root(root)));
    let (reload_tx, reload_rx) = mpsc::channel::<ReloadSignal>();
    let plugin = ToolsPlugin::new(Arc::clone(&generator), reload_tx);

    plugin.build_start()?;

    thread::spawn(move || forward_reloads(reload_rx));

    let mut watcher = ToolWatcher::new(generator.config().tools_dir())
        .context("starting tools watcher")?;
    let stop = AtomicBool::new(false);
    watch_loop(
        &plugin,
        &mut watcher,
        Duration::from_millis(cli.interval_ms),
        &stop,
    );
    Ok(())
}

fn forward_reloads(signals: mpsc::Receiver<ReloadSignal>) {
    let stdout = io::stdout();
    for signal in signals {
        let Ok(line) = serde_json::to_string(&signal) else {
            continue;
        };
        let mut out = stdout.lock();
        if writeln!(out, "{line}").and_then(|()| out.flush()).is_err() {
            break;
        }
    }
}
