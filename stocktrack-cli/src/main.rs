//! Stocktrack CLI — one fetch, report and sheet-mirror pass.
//!
//! Reads `stocktrack.toml` (or `--config <path>`); when the file is absent the
//! built-in defaults are used. Log verbosity follows `RUST_LOG`, default `info`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};
use stocktrack_core::{StockTracker, TrackerConfig, TracingObserver};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stocktrack",
    about = "Dealership stock tracker — fetch, report, mirror"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, default_value = "stocktrack.toml")]
    config: PathBuf,

    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let as_of = cli
        .as_of
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--as-of must be YYYY-MM-DD")?;

    let tracker = StockTracker::from_config(&config)?;
    let summary = match as_of {
        Some(as_of) => tracker.run(&TracingObserver, as_of)?,
        None => tracker.run_today(&TracingObserver)?,
    };

    for file in summary.reports.files() {
        tracing::debug!(path = %file.path.display(), rows = file.rows, "{} report", file.window);
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<TrackerConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        return Ok(TrackerConfig::default());
    }
    TrackerConfig::from_file(path)
        .with_context(|| format!("failed to load config {}", path.display()))
}
