//! Command-line interface
//!
//! - Argument parsing with clap
//! - Configuration merging (CLI args + config files)
//! - Command execution and validation
//! - Command handlers for serve and migrate operations

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use anyhow::Context;
use clap::Parser;

use crate::config::settings::Settings;
use crate::logger::init_logger;

/// Parses the command line, loads configuration, initializes logging and
/// runs the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;
    execute_command(&cli, settings).await
}

/// Loads the layered configuration and applies CLI overrides on top.
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    ConfigurationMerger::from_cli(cli)
        .and_then(|merger| merger.merge_cli_args(cli))
        .context("Failed to load configuration")
}

/// Installs the global tracing subscriber described by the settings.
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Invalid logger configuration")?;

    init_logger(logger_config).context("Failed to initialize logger")
}
