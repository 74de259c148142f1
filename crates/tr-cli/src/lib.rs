//! tr-cli library
//!
//! Exports the TestRail HTTP client for use in tests and other crates.

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod error;
pub(crate) mod logger;
pub(crate) mod mapping_commands;
pub(crate) mod migrate_commands;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use client::HttpClient;
pub use error::{CliError, Result as CliResult};

use crate::commands::Commands;

use tr_config::Config;

use std::path::PathBuf;

use serde_json::Value;

/// Load configuration, start logging and run one command.
pub async fn run(cli: Cli) -> CliResult<Value> {
    let config = match &cli.config_dir {
        Some(dir) => Config::load_from(dir)?,
        None => Config::load()?,
    };
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.logging.file.as_ref().map(PathBuf::from),
        config.logging.colored,
    )?;
    config.log_summary();

    match cli.command {
        Commands::Migrate { target, args } => migrate_commands::run(&config, target, &args).await,
        Commands::Mapping { action } => match action {
            mapping_commands::MappingCommands::Show { file } => mapping_commands::show(&file),
        },
    }
}
