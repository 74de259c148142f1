use tr_core::EntityKind;

use serde::Serialize;

/// Result of the import step of one phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportOutcome {
    pub imported: usize,
    /// One entry per failed item, prefixed with the item's label.
    pub errors: Vec<String>,
}

impl ImportOutcome {
    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn merge(&mut self, other: ImportOutcome) {
        self.imported += other.imported;
        self.errors.extend(other.errors);
    }
}

/// Counts for one Fetch -> Filter -> Import phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseReport {
    pub kind: EntityKind,
    pub dry_run: bool,
    pub source_count: usize,
    pub target_count: usize,
    /// Source entities already present in the target.
    pub matched: usize,
    /// Source entities selected for creation.
    pub filtered: usize,
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl PhaseReport {
    pub(crate) fn new(
        kind: EntityKind,
        dry_run: bool,
        source_count: usize,
        target_count: usize,
        filtered: usize,
        outcome: ImportOutcome,
    ) -> Self {
        Self {
            kind,
            dry_run,
            source_count,
            target_count,
            matched: source_count.saturating_sub(filtered),
            filtered,
            imported: outcome.imported,
            failed: outcome.failed(),
            errors: outcome.errors,
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "{}: source={} target={} matched={} filtered={} imported={} failed={}{}",
            self.kind,
            self.source_count,
            self.target_count,
            self.matched,
            self.filtered,
            self.imported,
            self.failed,
            if self.dry_run { " (dry run)" } else { "" }
        );
        for error in &self.errors {
            log::warn!("  {}: {}", self.kind, error);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub phases: Vec<PhaseReport>,
}

impl MigrationReport {
    pub fn imported(&self) -> usize {
        self.phases.iter().map(|phase| phase.imported).sum()
    }

    pub fn failed(&self) -> usize {
        self.phases.iter().map(|phase| phase.failed).sum()
    }

    pub fn phase(&self, kind: EntityKind) -> Option<&PhaseReport> {
        self.phases.iter().find(|phase| phase.kind == kind)
    }
}
