use crate::migration::filter::matched_pairs;
use crate::{
    ImportOutcome, Mapping, MappingStatus, MigrationMetrics, MigrationReport, MigrationResult,
    PhaseReport,
};

use tr_concurrency::{AdaptiveRateLimiter, BatchProcessor, CircuitBreaker, RateLimiter, RetryConfig};
use tr_core::{Entity, EntityKind, MissingSharedStepPolicy, TestManagementClient};

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Phase order of a full migration. Sections need suites, cases need
/// sections and shared steps.
const FULL_ORDER: [EntityKind; 4] = [
    EntityKind::Suites,
    EntityKind::Sections,
    EntityKind::SharedSteps,
    EntityKind::Cases,
];

/// One mapping per entity kind.
#[derive(Debug)]
pub(crate) struct KindMappings {
    shared_steps: Mutex<Mapping>,
    suites: Mutex<Mapping>,
    sections: Mutex<Mapping>,
    cases: Mutex<Mapping>,
}

impl KindMappings {
    pub(crate) fn new(src_project: i64, dst_project: i64) -> Self {
        Self {
            shared_steps: Mutex::new(Mapping::new(src_project, dst_project)),
            suites: Mutex::new(Mapping::new(src_project, dst_project)),
            sections: Mutex::new(Mapping::new(src_project, dst_project)),
            cases: Mutex::new(Mapping::new(src_project, dst_project)),
        }
    }

    fn get(&self, kind: EntityKind) -> &Mutex<Mapping> {
        match kind {
            EntityKind::SharedSteps => &self.shared_steps,
            EntityKind::Suites => &self.suites,
            EntityKind::Sections => &self.sections,
            EntityKind::Cases => &self.cases,
        }
    }
}

/// A single migration run from one project (and suite) to another.
///
/// Built with [`MigrationBuilder`](crate::MigrationBuilder). Every entity kind
/// has `fetch_*_data`, `filter_*`, `import_*` and `migrate_*` operations;
/// [`Migration::migrate_full`] chains the kinds in dependency order.
pub struct Migration {
    pub(crate) client: Arc<dyn TestManagementClient>,
    pub(crate) src_project: i64,
    pub(crate) src_suite: Option<i64>,
    pub(crate) dst_project: i64,
    pub(crate) dst_suite: Option<i64>,
    pub(crate) dst_section: Option<i64>,
    pub(crate) compare_field: String,
    pub(crate) workers: usize,
    pub(crate) limiter: Arc<RateLimiter>,
    pub(crate) adaptive: Option<Arc<AdaptiveRateLimiter>>,
    pub(crate) retry: Option<RetryConfig>,
    pub(crate) breaker: Option<Arc<CircuitBreaker>>,
    pub(crate) batch: BatchProcessor,
    pub(crate) missing_shared_step: MissingSharedStepPolicy,
    pub(crate) mappings: KindMappings,
    pub(crate) metrics: MigrationMetrics,
}

impl Migration {
    pub fn src_project(&self) -> i64 {
        self.src_project
    }

    pub fn dst_project(&self) -> i64 {
        self.dst_project
    }

    pub fn compare_field(&self) -> &str {
        &self.compare_field
    }

    pub fn missing_shared_step_policy(&self) -> MissingSharedStepPolicy {
        self.missing_shared_step
    }

    /// Snapshot of the mapping recorded so far for `kind`.
    pub fn mapping(&self, kind: EntityKind) -> Mapping {
        self.lock_mapping(kind).clone()
    }

    pub fn shared_step_mapping(&self) -> Mapping {
        self.mapping(EntityKind::SharedSteps)
    }

    /// Persist the shared-step mapping into `dir`. Nothing is written when it
    /// is empty.
    pub fn save_mapping(&self, dir: &Path) -> MigrationResult<Option<PathBuf>> {
        let mut snapshot = self.shared_step_mapping();
        snapshot.save(dir)
    }

    /// Replace the shared-step mapping with one read from `path`, in either
    /// the full or the legacy flat shape. Returns the number of pairs loaded.
    pub fn load_mapping_from_file(&self, path: &Path) -> MigrationResult<usize> {
        let mut loaded = Mapping::load(path)?;
        loaded.adopt_projects(self.src_project, self.dst_project);
        let count = loaded.count();
        *self.lock_mapping(EntityKind::SharedSteps) = loaded;
        log::info!("Using {count} shared step mappings from {}", path.display());
        Ok(count)
    }

    /// Run one Fetch -> Filter -> Import phase.
    pub async fn migrate(&self, kind: EntityKind, dry_run: bool) -> MigrationResult<PhaseReport> {
        match kind {
            EntityKind::SharedSteps => self.migrate_shared_steps(dry_run).await,
            EntityKind::Suites => self.migrate_suites(dry_run).await,
            EntityKind::Sections => self.migrate_sections(dry_run).await,
            EntityKind::Cases => self.migrate_cases(dry_run).await,
        }
    }

    /// Suites, sections, shared steps, then cases. The first failing phase
    /// stops the chain.
    pub async fn migrate_full(&self, dry_run: bool) -> MigrationResult<MigrationReport> {
        let mut report = MigrationReport::default();

        for kind in FULL_ORDER {
            match self.migrate(kind, dry_run).await {
                Ok(phase) => report.phases.push(phase),
                Err(e) => {
                    log::error!("Full migration stopped during {kind} phase: {e}");
                    return Err(e);
                }
            }
        }

        log::info!(
            "Full migration complete: {} imported, {} failed",
            report.imported(),
            report.failed()
        );
        Ok(report)
    }

    /// Flush buffered log output. Call once the run is over, whether it
    /// succeeded or not.
    pub fn close(&self) {
        log::debug!(
            "Closing migration {} -> {}",
            self.src_project,
            self.dst_project
        );
        log::logger().flush();
    }

    /// Pair every source entity that already exists in the target as
    /// `existing`, so later phases can rewrite references to it.
    pub(crate) fn record_existing<E: Entity>(&self, source: &[E], target: &[E]) -> usize {
        let pairs = matched_pairs(source, target, &self.compare_field);
        let mut mapping = self.lock_mapping(E::KIND);
        pairs
            .into_iter()
            .filter(|(source_id, target_id)| {
                mapping.add_pair(*source_id, *target_id, MappingStatus::Existing)
            })
            .count()
    }

    pub(crate) fn finish_phase<E: Entity>(
        &self,
        dry_run: bool,
        source: &[E],
        target: &[E],
        filtered: &[E],
        outcome: ImportOutcome,
    ) -> PhaseReport {
        let report = PhaseReport::new(
            E::KIND,
            dry_run,
            source.len(),
            target.len(),
            filtered.len(),
            outcome,
        );
        self.metrics.items_skipped(E::KIND, report.matched);
        report.log_summary();
        report
    }

    pub(crate) fn target_for(&self, kind: EntityKind, source_id: i64) -> Option<i64> {
        self.lock_mapping(kind).get_target_by_source(source_id)
    }

    pub(crate) fn lock_mapping(&self, kind: EntityKind) -> MutexGuard<'_, Mapping> {
        self.mappings
            .get(kind)
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
