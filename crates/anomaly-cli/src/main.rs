//! Fuzzy Anomaly Detector - Main Entry Point

use anomaly_cli::{init_logging, render_assessment, render_demo, run_demo, run_eval, Settings};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "fuzzy-anomaly")]
#[command(version)]
#[command(about = "Mamdani fuzzy anomaly detection over time-series window indicators", long_about = None)]
struct Cli {
    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score the normal and anomalous windows of the synthetic scenario
    Demo {
        /// Scenario seed (defaults to the configured seed)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Score one set of indicator values
    Eval {
        #[arg(long, allow_negative_numbers = true)]
        forecast_error: f64,

        #[arg(long, allow_negative_numbers = true)]
        variance_change: f64,

        #[arg(long, allow_negative_numbers = true)]
        correlation_change: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_str().context("Config path is not valid UTF-8"))
        .transpose()?;
    let settings = Settings::load(config_path).context("Failed to load settings")?;
    init_logging(&settings.log)?;

    info!("=== Fuzzy Anomaly v{} ===", env!("CARGO_PKG_VERSION"));

    let output = match cli.command {
        Command::Demo { seed } => {
            let report = run_demo(&settings, seed.unwrap_or(settings.seed))?;
            if cli.json {
                serde_json::to_string_pretty(&report)?
            } else {
                render_demo(&report)
            }
        }
        Command::Eval {
            forecast_error,
            variance_change,
            correlation_change,
        } => {
            let assessment = run_eval(&settings, forecast_error, variance_change, correlation_change)?;
            if cli.json {
                serde_json::to_string_pretty(&assessment)?
            } else {
                render_assessment(&assessment)
            }
        }
    };

    println!("{}", output.trim_end());
    Ok(())
}
