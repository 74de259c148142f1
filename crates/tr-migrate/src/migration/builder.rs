use crate::migration::migration::KindMappings;
use crate::{Migration, MigrationError, MigrationMetrics, MigrationResult};

use tr_concurrency::{AdaptiveRateLimiter, BatchProcessor, CircuitBreaker, RateLimiter, RetryConfig};
use tr_core::{MissingSharedStepPolicy, TestManagementClient};

use std::sync::Arc;

const DEFAULT_COMPARE_FIELD: &str = "title";
const DEFAULT_WORKERS: usize = 5;
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 150;

/// Assembles a [`Migration`]. Only the client and the two project IDs are
/// required; retry and circuit breaking are off unless configured.
pub struct MigrationBuilder {
    client: Arc<dyn TestManagementClient>,
    src_project: i64,
    dst_project: i64,
    src_suite: Option<i64>,
    dst_suite: Option<i64>,
    dst_section: Option<i64>,
    compare_field: String,
    workers: usize,
    limiter: Option<Arc<RateLimiter>>,
    adaptive: Option<Arc<AdaptiveRateLimiter>>,
    retry: Option<RetryConfig>,
    breaker: Option<Arc<CircuitBreaker>>,
    batch: BatchProcessor,
    missing_shared_step: MissingSharedStepPolicy,
}

impl MigrationBuilder {
    pub fn new(client: Arc<dyn TestManagementClient>, src_project: i64, dst_project: i64) -> Self {
        Self {
            client,
            src_project,
            dst_project,
            src_suite: None,
            dst_suite: None,
            dst_section: None,
            compare_field: DEFAULT_COMPARE_FIELD.to_string(),
            workers: DEFAULT_WORKERS,
            limiter: None,
            adaptive: None,
            retry: None,
            breaker: None,
            batch: BatchProcessor::default(),
            missing_shared_step: MissingSharedStepPolicy::default(),
        }
    }

    pub fn src_suite(mut self, suite_id: Option<i64>) -> Self {
        self.src_suite = suite_id;
        self
    }

    pub fn dst_suite(mut self, suite_id: Option<i64>) -> Self {
        self.dst_suite = suite_id;
        self
    }

    /// Fallback destination section for cases whose source section is not
    /// mapped.
    pub fn dst_section(mut self, section_id: Option<i64>) -> Self {
        self.dst_section = section_id;
        self
    }

    pub fn compare_field<S: Into<String>>(mut self, field: S) -> Self {
        self.compare_field = field.into();
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Takes precedence over [`MigrationBuilder::rate_limiter`]: the adaptive
    /// limiter's inner limiter gates every call.
    pub fn adaptive_rate_limiter(mut self, adaptive: Arc<AdaptiveRateLimiter>) -> Self {
        self.adaptive = Some(adaptive);
        self
    }

    pub fn retry(mut self, config: Option<RetryConfig>) -> Self {
        self.retry = config;
        self
    }

    pub fn circuit_breaker(mut self, breaker: Option<Arc<CircuitBreaker>>) -> Self {
        self.breaker = breaker;
        self
    }

    pub fn batch_processor(mut self, batch: BatchProcessor) -> Self {
        self.batch = batch;
        self
    }

    pub fn missing_shared_step(mut self, policy: MissingSharedStepPolicy) -> Self {
        self.missing_shared_step = policy;
        self
    }

    pub fn build(self) -> MigrationResult<Migration> {
        if self.src_project <= 0 || self.dst_project <= 0 {
            return Err(MigrationError::configuration(format!(
                "project IDs must be positive (source {}, destination {})",
                self.src_project, self.dst_project
            )));
        }

        let compare_field = self.compare_field.trim().to_string();
        if compare_field.is_empty() {
            return Err(MigrationError::configuration("compare field cannot be empty"));
        }

        let limiter = match (&self.adaptive, self.limiter) {
            (Some(adaptive), _) => Arc::clone(adaptive.limiter()),
            (None, Some(limiter)) => limiter,
            (None, None) => Arc::new(RateLimiter::new(DEFAULT_REQUESTS_PER_MINUTE)),
        };

        Ok(Migration {
            client: self.client,
            src_project: self.src_project,
            src_suite: self.src_suite,
            dst_project: self.dst_project,
            dst_suite: self.dst_suite,
            dst_section: self.dst_section,
            compare_field,
            workers: self.workers.max(1),
            limiter,
            adaptive: self.adaptive,
            retry: self.retry,
            breaker: self.breaker,
            batch: self.batch,
            missing_shared_step: self.missing_shared_step,
            mappings: KindMappings::new(self.src_project, self.dst_project),
            metrics: MigrationMetrics::new(),
        })
    }
}
