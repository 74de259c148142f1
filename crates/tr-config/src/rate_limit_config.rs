use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Rate limit constraints
pub const MIN_REQUESTS_PER_MINUTE: u32 = 1;
pub const MAX_REQUESTS_PER_MINUTE: u32 = 10000;
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 180;

/// Outbound request throttling for the API client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per minute
    pub requests_per_minute: u32,
    /// Adjust the rate from observed response times
    pub adaptive: bool,
    /// Ceiling the adaptive limiter never exceeds
    pub target_requests_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            adaptive: false,
            target_requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, value) in [
            ("requests_per_minute", self.requests_per_minute),
            ("target_requests_per_minute", self.target_requests_per_minute),
        ] {
            if !(MIN_REQUESTS_PER_MINUTE..=MAX_REQUESTS_PER_MINUTE).contains(&value) {
                return Err(ConfigError::config(format!(
                    "rate_limit.{} must be {}-{}, got {}",
                    name, MIN_REQUESTS_PER_MINUTE, MAX_REQUESTS_PER_MINUTE, value
                )));
            }
        }

        Ok(())
    }
}
