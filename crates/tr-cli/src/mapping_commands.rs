use crate::error::Result as CliErrorResult;

use tr_migrate::Mapping;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde_json::Value;

#[derive(Subcommand)]
pub enum MappingCommands {
    /// Print a mapping file (full or legacy flat shape) as JSON
    Show {
        /// Mapping file path
        file: PathBuf,
    },
}

pub(crate) fn show(file: &Path) -> CliErrorResult<Value> {
    let mapping = Mapping::load(file)?;
    Ok(serde_json::to_value(&mapping)?)
}
