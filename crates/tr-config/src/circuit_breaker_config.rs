use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Circuit breaker constraints
pub const MIN_MAX_FAILURES: u32 = 1;
pub const MAX_MAX_FAILURES: u32 = 100;
pub const DEFAULT_MAX_FAILURES: u32 = 5;

pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Circuit breaker configuration for API resilience.
///
/// The circuit breaker stops hammering the remote system once it looks
/// unhealthy and lets a single trial request through after the timeout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Guard creation calls with a breaker at all
    pub enabled: bool,
    /// Consecutive failures before opening the circuit
    pub max_failures: u32,
    /// Seconds to keep the circuit open before a trial request
    pub timeout_secs: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_failures: DEFAULT_MAX_FAILURES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_failures < MIN_MAX_FAILURES || self.max_failures > MAX_MAX_FAILURES {
            return Err(ConfigError::config(format!(
                "circuit_breaker.max_failures must be {}-{}, got {}",
                MIN_MAX_FAILURES, MAX_MAX_FAILURES, self.max_failures
            )));
        }

        if self.timeout_secs < MIN_TIMEOUT_SECS || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::config(format!(
                "circuit_breaker.timeout_secs must be {}-{}, got {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        Ok(())
    }
}
