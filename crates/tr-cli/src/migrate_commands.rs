use crate::HttpClient;
use crate::error::{CliError, Result as CliErrorResult};

use tr_concurrency::{AdaptiveRateLimiter, BatchProcessor, CircuitBreaker, RateLimiter, RetryConfig};
use tr_config::Config;
use tr_core::{EntityKind, TestManagementClient};
use tr_migrate::{Migration, MigrationBuilder};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, ValueEnum};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MigrateTarget {
    SharedSteps,
    Suites,
    Sections,
    Cases,
    /// Suites, sections, shared steps, then cases
    Full,
}

impl MigrateTarget {
    pub(crate) fn kind(self) -> Option<EntityKind> {
        match self {
            MigrateTarget::SharedSteps => Some(EntityKind::SharedSteps),
            MigrateTarget::Suites => Some(EntityKind::Suites),
            MigrateTarget::Sections => Some(EntityKind::Sections),
            MigrateTarget::Cases => Some(EntityKind::Cases),
            MigrateTarget::Full => None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct MigrateArgs {
    /// Source project ID
    #[arg(long)]
    pub src_project: i64,

    /// Destination project ID
    #[arg(long)]
    pub dst_project: i64,

    /// Restrict reads to this source suite
    #[arg(long)]
    pub src_suite: Option<i64>,

    /// Destination suite for created sections and case lookups
    #[arg(long)]
    pub dst_suite: Option<i64>,

    /// Fallback destination section for cases whose section was not migrated
    #[arg(long)]
    pub dst_section: Option<i64>,

    /// Field used to detect entities that already exist (overrides config)
    #[arg(long)]
    pub compare_field: Option<String>,

    /// Report what would be created without creating anything
    #[arg(long)]
    pub dry_run: bool,

    /// Concurrent create calls (overrides config)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Create calls per minute (overrides config)
    #[arg(long)]
    pub rpm: Option<u32>,

    /// Shared-step mapping from an earlier run
    #[arg(long)]
    pub mapping_file: Option<PathBuf>,

    /// Where to save the shared-step mapping (overrides config)
    #[arg(long)]
    pub save_mapping_dir: Option<PathBuf>,
}

/// Run a migration and return the JSON report.
///
/// The migration is closed whether or not it succeeded.
pub(crate) async fn run(
    config: &Config,
    target: MigrateTarget,
    args: &MigrateArgs,
) -> CliErrorResult<Value> {
    if !config.api.is_configured() {
        return Err(CliError::arguments(
            "api.base_url, api.user and api.api_key must be set (config.toml or TR_API_*)",
        ));
    }

    let client = HttpClient::from_config(&config.api)?.with_rate_limiter(Arc::new(
        RateLimiter::new(config.rate_limit.requests_per_minute),
    ));
    let migration = build_migration(config, args, Arc::new(client))?;

    let result = execute(&migration, config, target, args).await;
    migration.close();
    result
}

/// Run the requested phases, then save the shared-step mapping. Pairs created
/// before a failing phase are saved too.
pub(crate) async fn execute(
    migration: &Migration,
    config: &Config,
    target: MigrateTarget,
    args: &MigrateArgs,
) -> CliErrorResult<Value> {
    if let Some(path) = &args.mapping_file {
        migration.load_mapping_from_file(path)?;
    }

    let report = migrate_target(migration, target, args.dry_run).await;

    let saved = match save_mapping(migration, config, args) {
        Ok(saved) => saved,
        Err(e) if report.is_err() => {
            log::error!("Failed to save mapping after migration error: {e}");
            None
        }
        Err(e) => return Err(e),
    };
    let report = report?;

    Ok(json!({
        "report": report,
        "mapping_file": saved.map(|path| path.display().to_string()),
    }))
}

async fn migrate_target(
    migration: &Migration,
    target: MigrateTarget,
    dry_run: bool,
) -> CliErrorResult<Value> {
    let report = match target.kind() {
        Some(kind) => serde_json::to_value(migration.migrate(kind, dry_run).await?)?,
        None => serde_json::to_value(migration.migrate_full(dry_run).await?)?,
    };
    Ok(report)
}

fn save_mapping(
    migration: &Migration,
    config: &Config,
    args: &MigrateArgs,
) -> CliErrorResult<Option<PathBuf>> {
    if args.dry_run {
        return Ok(None);
    }
    let dir = args
        .save_mapping_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.migration.mapping_dir));
    Ok(migration.save_mapping(&dir)?)
}

/// Assemble the migration from the loaded configuration, with command-line
/// flags taking precedence.
pub(crate) fn build_migration(
    config: &Config,
    args: &MigrateArgs,
    client: Arc<dyn TestManagementClient>,
) -> CliErrorResult<Migration> {
    let workers = args.workers.unwrap_or(config.worker_pool.max_workers);
    if workers == 0 {
        return Err(CliError::arguments("--workers must be at least 1"));
    }
    let rpm = args.rpm.unwrap_or(config.worker_pool.requests_per_minute);

    let compare_field = args
        .compare_field
        .clone()
        .unwrap_or_else(|| config.migration.compare_field.clone());

    let mut builder = MigrationBuilder::new(client, args.src_project, args.dst_project)
        .src_suite(args.src_suite)
        .dst_suite(args.dst_suite)
        .dst_section(args.dst_section)
        .compare_field(compare_field)
        .workers(workers)
        .retry(retry_config(config))
        .circuit_breaker(circuit_breaker(config))
        .batch_processor(batch_processor(config))
        .missing_shared_step(config.migration.missing_shared_step);

    builder = if config.rate_limit.adaptive {
        builder.adaptive_rate_limiter(Arc::new(AdaptiveRateLimiter::new(
            rpm,
            config.rate_limit.target_requests_per_minute,
        )))
    } else {
        builder.rate_limiter(Arc::new(RateLimiter::new(rpm)))
    };

    Ok(builder.build()?)
}

pub(crate) fn retry_config(config: &Config) -> Option<RetryConfig> {
    let retry = &config.retry;
    retry.enabled.then(|| RetryConfig {
        max_retries: retry.max_retries,
        initial_delay: Duration::from_millis(retry.initial_delay_ms),
        max_delay: Duration::from_secs(retry.max_delay_secs),
        backoff_multiplier: retry.backoff_multiplier,
        retryable_errors: retry.retryable_errors.clone(),
    })
}

pub(crate) fn circuit_breaker(config: &Config) -> Option<Arc<CircuitBreaker>> {
    let breaker = &config.circuit_breaker;
    breaker.enabled.then(|| {
        Arc::new(CircuitBreaker::new(
            breaker.max_failures,
            Duration::from_secs(breaker.timeout_secs),
        ))
    })
}

pub(crate) fn batch_processor(config: &Config) -> BatchProcessor {
    let batch = &config.batch;
    BatchProcessor::new()
        .with_batch_size(batch.batch_size)
        .with_retries(batch.max_retries, Duration::from_millis(batch.retry_delay_ms))
        .with_inter_batch_delay(Duration::from_millis(batch.inter_batch_delay_ms))
}
