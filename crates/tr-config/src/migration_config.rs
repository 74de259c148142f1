use crate::{ConfigError, ConfigErrorResult};

use tr_core::MissingSharedStepPolicy;

use serde::Deserialize;

pub const DEFAULT_COMPARE_FIELD: &str = "title";
pub const DEFAULT_MAPPING_DIR: &str = "mappings";

/// Behaviour of the migration engine itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Entity attribute used to decide whether a source entity already exists
    pub compare_field: String,
    /// Directory the shared-step mapping is written to
    pub mapping_dir: String,
    /// What case import does with an unmapped shared step reference
    pub missing_shared_step: MissingSharedStepPolicy,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            compare_field: String::from(DEFAULT_COMPARE_FIELD),
            mapping_dir: String::from(DEFAULT_MAPPING_DIR),
            missing_shared_step: MissingSharedStepPolicy::default(),
        }
    }
}

impl MigrationConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.compare_field.trim().is_empty() {
            return Err(ConfigError::migration(
                "migration.compare_field must not be empty",
            ));
        }

        if self.mapping_dir.trim().is_empty() {
            return Err(ConfigError::migration(
                "migration.mapping_dir must not be empty",
            ));
        }

        Ok(())
    }
}
