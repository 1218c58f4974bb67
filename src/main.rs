use std::path::PathBuf;

use anyhow::{Context, Result};
use cadence_config::CadenceConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod replay;
mod scenario;

use commands::replay::OutputFormat;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(author, version, about = "Headless driver for the Cadence page choreography engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./cadence.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario against a page and print the resulting mutations
    Replay {
        /// Page markup to scan
        page: PathBuf,
        /// Scenario file (TOML)
        #[arg(short, long)]
        scenario: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print what the engine would manage on a page
    Inspect {
        /// Page markup to scan
        page: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Replay {
            page,
            scenario,
            format,
        } => commands::replay::run(&page, &scenario, &config, format),
        Commands::Inspect { page } => commands::inspect::run(&page, &config),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<CadenceConfig> {
    let config = match path {
        Some(path) => {
            let mut config = CadenceConfig::load_from_file(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            config.merge_with_env();
            config
        }
        None => CadenceConfig::load(),
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}
