mod api_config;
mod batch_config;
mod circuit_breaker_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod migration_config;
mod rate_limit_config;
mod retry_config;
mod worker_pool_config;

pub use api_config::ApiConfig;
pub use batch_config::BatchConfig;
pub use circuit_breaker_config::CircuitBreakerConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use migration_config::MigrationConfig;
pub use rate_limit_config::RateLimitConfig;
pub use retry_config::RetryConfig;
pub use worker_pool_config::WorkerPoolConfig;

#[cfg(test)]
mod tests;

const CONFIG_DIR_ENV: &str = "TR_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".tr";
const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
