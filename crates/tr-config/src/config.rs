use crate::{
    ApiConfig, BatchConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, CircuitBreakerConfig, ConfigError,
    ConfigErrorResult, DEFAULT_CONFIG_DIR, LoggingConfig, MigrationConfig, RateLimitConfig,
    RetryConfig, WorkerPoolConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub worker_pool: WorkerPoolConfig,
    pub retry: RetryConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub batch: BatchConfig,
    pub migration: MigrationConfig,
}

impl Config {
    /// Load from `TR_CONFIG_DIR` (or `./.tr/`, created on demand): `config.toml`
    /// when present, defaults otherwise, then `TR_*` overrides.
    ///
    /// The result is not validated; follow with [`Config::validate`].
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;
        Self::load_from(&config_dir)
    }

    /// Same as [`Config::load`] with an explicit directory (`--config-dir`).
    pub fn load_from(config_dir: &Path) -> ConfigErrorResult<Self> {
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.to_path_buf(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `TR_CONFIG_DIR` if set, else `.tr` under the working directory.
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Range-check every section.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.api.validate()?;
        self.rate_limit.validate()?;
        self.worker_pool.validate()?;
        self.retry.validate()?;
        self.circuit_breaker.validate()?;
        self.batch.validate()?;
        self.migration.validate()?;

        Ok(())
    }

    /// Log the effective settings. The API key is never printed.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  api: {} as {} (timeout {}s)",
            if self.api.base_url.is_empty() {
                "<unset>"
            } else {
                self.api.base_url.as_str()
            },
            if self.api.user.is_empty() {
                "<unset>"
            } else {
                self.api.user.as_str()
            },
            self.api.timeout_secs
        );

        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );

        info!(
            "  rate_limit: {}/min (adaptive: {}, target {}/min)",
            self.rate_limit.requests_per_minute,
            self.rate_limit.adaptive,
            self.rate_limit.target_requests_per_minute
        );

        info!(
            "  worker_pool: workers={}, rate={}/min",
            self.worker_pool.max_workers, self.worker_pool.requests_per_minute
        );

        info!(
            "  retry: enabled={}, retries={}, initial={}ms, max={}s, backoff={}x",
            self.retry.enabled,
            self.retry.max_retries,
            self.retry.initial_delay_ms,
            self.retry.max_delay_secs,
            self.retry.backoff_multiplier
        );

        info!(
            "  circuit_breaker: enabled={}, max_failures={}, timeout={}s",
            self.circuit_breaker.enabled,
            self.circuit_breaker.max_failures,
            self.circuit_breaker.timeout_secs
        );

        info!(
            "  batch: size={}, retries={}, delay={}ms, gap={}ms",
            self.batch.batch_size,
            self.batch.max_retries,
            self.batch.retry_delay_ms,
            self.batch.inter_batch_delay_ms
        );

        info!(
            "  migration: compare_field={}, mapping_dir={}, missing_shared_step={}",
            self.migration.compare_field,
            self.migration.mapping_dir,
            self.migration.missing_shared_step.as_str()
        );
    }

    fn apply_env_overrides(&mut self) {
        // Api
        Self::apply_env_string("TR_API_BASE_URL", &mut self.api.base_url);
        Self::apply_env_string("TR_API_USER", &mut self.api.user);
        Self::apply_env_string("TR_API_KEY", &mut self.api.api_key);
        Self::apply_env_parse("TR_API_TIMEOUT_SECS", &mut self.api.timeout_secs);

        // Logging
        Self::apply_env_parse("TR_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("TR_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("TR_LOG_FILE", &mut self.logging.file);

        // Rate limit
        Self::apply_env_parse(
            "TR_RATE_LIMIT_RPM",
            &mut self.rate_limit.requests_per_minute,
        );
        Self::apply_env_bool("TR_RATE_LIMIT_ADAPTIVE", &mut self.rate_limit.adaptive);

        // Worker pool
        Self::apply_env_parse("TR_WORKERS", &mut self.worker_pool.max_workers);
        Self::apply_env_parse("TR_WORKER_RPM", &mut self.worker_pool.requests_per_minute);

        // Retry
        Self::apply_env_bool("TR_RETRY_ENABLED", &mut self.retry.enabled);
        Self::apply_env_parse("TR_RETRY_MAX_RETRIES", &mut self.retry.max_retries);
        Self::apply_env_parse(
            "TR_RETRY_INITIAL_DELAY_MS",
            &mut self.retry.initial_delay_ms,
        );
        Self::apply_env_parse("TR_RETRY_MAX_DELAY_SECS", &mut self.retry.max_delay_secs);
        Self::apply_env_parse(
            "TR_RETRY_BACKOFF_MULTIPLIER",
            &mut self.retry.backoff_multiplier,
        );

        // Circuit Breaker
        Self::apply_env_bool("TR_CB_ENABLED", &mut self.circuit_breaker.enabled);
        Self::apply_env_parse("TR_CB_MAX_FAILURES", &mut self.circuit_breaker.max_failures);
        Self::apply_env_parse("TR_CB_TIMEOUT_SECS", &mut self.circuit_breaker.timeout_secs);

        // Batch
        Self::apply_env_parse("TR_BATCH_SIZE", &mut self.batch.batch_size);

        // Migration
        Self::apply_env_string("TR_COMPARE_FIELD", &mut self.migration.compare_field);
        Self::apply_env_string("TR_MAPPING_DIR", &mut self.migration.mapping_dir);
        Self::apply_env_parse(
            "TR_MISSING_SHARED_STEP",
            &mut self.migration.missing_shared_step,
        );
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// `true` and `1` enable, anything else disables.
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values are ignored.
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
