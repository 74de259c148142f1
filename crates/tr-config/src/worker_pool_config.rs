use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_MAX_WORKERS: usize = 1;
pub const MAX_MAX_WORKERS: usize = 64;
pub const DEFAULT_MAX_WORKERS: usize = 5;

pub const MIN_WORKER_REQUESTS_PER_MINUTE: u32 = 1;
pub const MAX_WORKER_REQUESTS_PER_MINUTE: u32 = 10000;
pub const DEFAULT_WORKER_REQUESTS_PER_MINUTE: u32 = 150;

/// Bounded fan-out used by the import step.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerPoolConfig {
    /// Maximum creation calls in flight at once
    pub max_workers: usize,
    /// Rate shared by all workers
    pub requests_per_minute: u32,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            requests_per_minute: DEFAULT_WORKER_REQUESTS_PER_MINUTE,
        }
    }
}

impl WorkerPoolConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_workers < MIN_MAX_WORKERS || self.max_workers > MAX_MAX_WORKERS {
            return Err(ConfigError::config(format!(
                "worker_pool.max_workers must be {}-{}, got {}",
                MIN_MAX_WORKERS, MAX_MAX_WORKERS, self.max_workers
            )));
        }

        if self.requests_per_minute < MIN_WORKER_REQUESTS_PER_MINUTE
            || self.requests_per_minute > MAX_WORKER_REQUESTS_PER_MINUTE
        {
            return Err(ConfigError::config(format!(
                "worker_pool.requests_per_minute must be {}-{}, got {}",
                MIN_WORKER_REQUESTS_PER_MINUTE,
                MAX_WORKER_REQUESTS_PER_MINUTE,
                self.requests_per_minute
            )));
        }

        Ok(())
    }
}
