use crate::common::StubClient;

use tr_concurrency::{BatchProcessor, RateLimiter};
use tr_migrate::MigrationBuilder;

use std::sync::Arc;
use std::time::Duration;

pub const SRC_PROJECT: i64 = 1;
pub const DST_PROJECT: i64 = 2;

/// Builder with throttling and pauses switched off so tests run instantly.
pub fn migration_builder(stub: &Arc<StubClient>) -> MigrationBuilder {
    MigrationBuilder::new(stub.clone(), SRC_PROJECT, DST_PROJECT)
        .rate_limiter(Arc::new(RateLimiter::unlimited()))
        .batch_processor(
            BatchProcessor::new()
                .with_retries(1, Duration::from_millis(1))
                .with_inter_batch_delay(Duration::ZERO),
        )
}
