use tr_core::EntityKind;

use std::time::Duration;

use metrics::{counter, histogram};

/// Metrics collector for migration runs
#[derive(Debug, Clone)]
pub struct MigrationMetrics {
    prefix: &'static str,
}

impl MigrationMetrics {
    pub fn new() -> Self {
        Self {
            prefix: "tr_migrate",
        }
    }

    /// Record an entity created in the destination
    pub fn item_imported(&self, kind: EntityKind) {
        counter!(format!("{}.items.imported", self.prefix)).increment(1);
        counter!(format!("{}.{}.imported", self.prefix, kind)).increment(1);
    }

    /// Record a creation that failed after all retries
    pub fn item_failed(&self, kind: EntityKind) {
        counter!(format!("{}.items.failed", self.prefix)).increment(1);
        counter!(format!("{}.{}.failed", self.prefix, kind)).increment(1);
    }

    /// Record source entities skipped because they already exist
    pub fn items_skipped(&self, kind: EntityKind, count: usize) {
        counter!(format!("{}.{}.skipped", self.prefix, kind)).increment(count as u64);
    }

    /// Record latency of one remote create call
    pub fn create_latency(&self, kind: EntityKind, duration: Duration) {
        histogram!(format!("{}.{}.create_latency_ms", self.prefix, kind))
            .record(duration.as_millis() as f64);
    }
}

impl Default for MigrationMetrics {
    fn default() -> Self {
        Self::new()
    }
}
