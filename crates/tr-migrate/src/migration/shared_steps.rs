use crate::migration::filter::filter_entities;
use crate::{ImportOutcome, Migration, MigrationResult, PhaseReport};

use tr_core::{AddSharedStepRequest, EntityKind, SharedStep};

impl Migration {
    pub async fn fetch_shared_steps_data(&self) -> MigrationResult<(Vec<SharedStep>, Vec<SharedStep>)> {
        self.fetch_both(
            EntityKind::SharedSteps,
            self.client.get_shared_steps(self.src_project),
            self.client.get_shared_steps(self.dst_project),
        )
        .await
    }

    pub fn filter_shared_steps(&self, source: &[SharedStep], target: &[SharedStep]) -> Vec<SharedStep> {
        filter_entities(source, target, &self.compare_field)
    }

    pub async fn import_shared_steps(
        &self,
        filtered: &[SharedStep],
        dry_run: bool,
    ) -> MigrationResult<ImportOutcome> {
        self.import_items(filtered, dry_run, |step: &SharedStep| {
            let request = AddSharedStepRequest::from(step);
            async move {
                let request = &request;
                self.call_guarded(EntityKind::SharedSteps, "add_shared_step", move || {
                    self.client.add_shared_step(self.dst_project, request)
                })
                .await
                .map(|created| created.id)
            }
        })
        .await
    }

    pub async fn migrate_shared_steps(&self, dry_run: bool) -> MigrationResult<PhaseReport> {
        let (source, target) = self.fetch_shared_steps_data().await?;
        let filtered = self.filter_shared_steps(&source, &target);
        if !dry_run {
            self.record_existing(&source, &target);
        }
        let outcome = self.import_shared_steps(&filtered, dry_run).await?;
        Ok(self.finish_phase(dry_run, &source, &target, &filtered, outcome))
    }
}
