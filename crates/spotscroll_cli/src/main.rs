//! Spotscroll CLI
//!
//! Replays scripted input against a headless scroll viewport and checks
//! scroller configuration files:
//!
//! ```text
//! spotscroll replay scenarios/page_down.toml --verbose
//! spotscroll replay scenarios/voice_rtl.toml --config tv.toml --json
//! spotscroll check-config tv.toml
//! ```

mod report;
mod runner;
mod scenario;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spotscroll::ScrollConfig;

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "spotscroll")]
#[command(author, version, about = "Scroll arbitration replay and config tooling")]
struct Cli {
    /// Log engine decisions (equivalent to RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario and print the per-step trace
    Replay {
        /// Scenario file (.toml or .json)
        scenario: PathBuf,

        /// Scroller config, replacing the scenario's own
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse and validate a scroller config file
    CheckConfig {
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Replay {
            scenario,
            config,
            json,
        } => cmd_replay(&scenario, config.as_deref(), json),
        Commands::CheckConfig { file } => cmd_check_config(&file),
    }
}

fn cmd_replay(path: &Path, config_path: Option<&Path>, json: bool) -> Result<ExitCode> {
    let scenario = Scenario::from_path(path)?;

    let config = match (config_path, &scenario.config) {
        (Some(config_path), _) => ScrollConfig::load(config_path)
            .with_context(|| format!("invalid config {}", config_path.display()))?,
        (None, Some(inline)) => {
            inline
                .validate()
                .with_context(|| format!("invalid config in {}", path.display()))?;
            inline.clone()
        }
        (None, None) => ScrollConfig::default(),
    };

    tracing::info!(
        "replaying {} ({} steps, {:?} mode)",
        path.display(),
        scenario.steps.len(),
        config.mode
    );

    let report = runner::replay(&scenario, config)?;
    let mut stdout = std::io::stdout().lock();
    if json {
        report.write_json(&mut stdout)?;
    } else {
        report.write_text(&mut stdout)?;
    }

    Ok(if report.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn cmd_check_config(path: &Path) -> Result<ExitCode> {
    let config = ScrollConfig::load(path)
        .with_context(|| format!("invalid config {}", path.display()))?;

    println!("{}: ok", path.display());
    println!(
        "  direction={:?} mode={:?} rtl={} page_multiplier={} animation={}ms",
        config.direction, config.mode, config.rtl, config.page_multiplier, config.animation_duration_ms
    );
    Ok(ExitCode::SUCCESS)
}
