use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 1000;
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_BATCH_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BATCH_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_INTER_BATCH_DELAY_MS: u64 = 100;

/// Settings for batch processing of bulk operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub inter_batch_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: DEFAULT_BATCH_MAX_RETRIES,
            retry_delay_ms: DEFAULT_BATCH_RETRY_DELAY_MS,
            inter_batch_delay_ms: DEFAULT_INTER_BATCH_DELAY_MS,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.batch_size < MIN_BATCH_SIZE || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::config(format!(
                "batch.batch_size must be {}-{}, got {}",
                MIN_BATCH_SIZE, MAX_BATCH_SIZE, self.batch_size
            )));
        }

        Ok(())
    }
}
