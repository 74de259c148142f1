use crate::migration::filter::filter_entities;
use crate::{ImportOutcome, Migration, MigrationError, MigrationResult, PhaseReport};

use tr_core::{AddSuiteRequest, ClientError, EntityKind, Suite};

impl Migration {
    /// Fetches both projects through the client's parallel multi-project
    /// call; one failing side is tolerated.
    pub async fn fetch_suites_data(&self) -> MigrationResult<(Vec<Suite>, Vec<Suite>)> {
        if self.src_project == self.dst_project {
            let suites = self.client.get_suites(self.src_project).await.map_err(|e| {
                MigrationError::fetch(EntityKind::Suites, "source", self.src_project, e.to_string())
            })?;
            return Ok((suites.clone(), suites));
        }

        let mut results = self
            .client
            .get_suites_parallel(&[self.src_project, self.dst_project], self.workers)
            .await;
        let missing = |project_id: i64| {
            Err(ClientError::http(format!(
                "no result returned for project {project_id}"
            )))
        };
        let source = results
            .remove(&self.src_project)
            .unwrap_or_else(|| missing(self.src_project));
        let target = results
            .remove(&self.dst_project)
            .unwrap_or_else(|| missing(self.dst_project));

        self.tolerate_partial(EntityKind::Suites, source, target)
    }

    pub fn filter_suites(&self, source: &[Suite], target: &[Suite]) -> Vec<Suite> {
        filter_entities(source, target, &self.compare_field)
    }

    pub async fn import_suites(&self, filtered: &[Suite], dry_run: bool) -> MigrationResult<ImportOutcome> {
        self.import_items(filtered, dry_run, |suite: &Suite| {
            let request = AddSuiteRequest::from(suite);
            async move {
                let request = &request;
                self.call_guarded(EntityKind::Suites, "add_suite", move || {
                    self.client.add_suite(self.dst_project, request)
                })
                .await
                .map(|created| created.id)
            }
        })
        .await
    }

    pub async fn migrate_suites(&self, dry_run: bool) -> MigrationResult<PhaseReport> {
        let (source, target) = self.fetch_suites_data().await?;
        let filtered = self.filter_suites(&source, &target);
        if !dry_run {
            self.record_existing(&source, &target);
        }
        let outcome = self.import_suites(&filtered, dry_run).await?;
        Ok(self.finish_phase(dry_run, &source, &target, &filtered, outcome))
    }
}
