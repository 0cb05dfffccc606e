// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Emergy Calculator CLI
//!
//! The `emergy` binary is the process root: it loads configuration, owns the
//! calculation store for the life of the process and exposes it over HTTP.
//!
//! ## Commands
//!
//! - `emergy serve` - Run the HTTP API
//! - `emergy ingest <FILE>` - Run one file through the pipeline and print the result
//! - `emergy config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use emergy_calculator::commands::{self, ConfigCommand, IngestArgs, ServeArgs};
use emergy_core::domain::config::{CalculatorConfig, LoggingConfig};

/// Emergy Calculator - ingest measurement records and compute emergy totals
#[derive(Parser)]
#[command(name = "emergy")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "EMERGY_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Defaults to the config file value.
    #[arg(long, global = true, env = "EMERGY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format (text, json). Defaults to the config file value.
    #[arg(long, global = true, env = "EMERGY_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    #[command(name = "serve")]
    Serve(ServeArgs),

    /// Ingest a record file and print the resulting calculation
    #[command(name = "ingest")]
    Ingest(IngestArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = resolve_logging(&cli);
    init_logging(&logging.level, &logging.format)?;

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, cli.config).await,
        Commands::Ingest(args) => commands::ingest::execute(args).await,
        Commands::Config { command } => commands::config::handle_command(command, cli.config).await,
    }
}

/// CLI flags win over the config file; an unreadable config falls back to defaults
/// here and is reported properly once the command loads it.
fn resolve_logging(cli: &Cli) -> LoggingConfig {
    let mut logging = if cli.log_level.is_some() && cli.log_format.is_some() {
        LoggingConfig::default()
    } else {
        CalculatorConfig::load_or_default(cli.config.clone())
            .map(|config| config.spec.observability.logging)
            .unwrap_or_default()
    };

    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging.format = format.clone();
    }
    logging
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        "json" => builder.json().init(),
        "text" => builder.compact().init(),
        other => anyhow::bail!("Unknown log format '{}'. Expected 'text' or 'json'", other),
    }

    Ok(())
}
