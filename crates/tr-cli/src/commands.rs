use crate::mapping_commands::MappingCommands;
use crate::migrate_commands::{MigrateArgs, MigrateTarget};

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Copy entities from one project into another
    Migrate {
        /// What to migrate
        #[arg(value_enum)]
        target: MigrateTarget,

        #[command(flatten)]
        args: MigrateArgs,
    },

    /// Inspect saved mapping files
    Mapping {
        #[command(subcommand)]
        action: MappingCommands,
    },
}
