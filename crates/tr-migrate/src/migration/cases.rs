use crate::migration::filter::filter_entities;
use crate::migration::import::ItemFailure;
use crate::{ImportOutcome, Migration, MigrationResult, PhaseReport};

use tr_core::{AddCaseRequest, Case, EntityKind, MissingSharedStepPolicy, Step};

impl Migration {
    pub async fn fetch_cases_data(&self) -> MigrationResult<(Vec<Case>, Vec<Case>)> {
        self.fetch_both(
            EntityKind::Cases,
            self.client.get_cases(self.src_project, self.src_suite, None),
            self.client.get_cases(self.dst_project, self.dst_suite, None),
        )
        .await
    }

    pub fn filter_cases(&self, source: &[Case], target: &[Case]) -> Vec<Case> {
        filter_entities(source, target, &self.compare_field)
    }

    /// Each case lands in the section its source section was mapped to, or
    /// the fallback destination section. Shared-step references are
    /// rewritten through the shared-step mapping.
    pub async fn import_cases(&self, filtered: &[Case], dry_run: bool) -> MigrationResult<ImportOutcome> {
        self.import_items(filtered, dry_run, |case: &Case| {
            let prepared = self.prepare_case(case);
            async move {
                let (section_id, request) = prepared?;
                let request = &request;
                self.call_guarded(EntityKind::Cases, "add_case", move || {
                    self.client.add_case(section_id, request)
                })
                .await
                .map(|created| created.id)
            }
        })
        .await
    }

    pub async fn migrate_cases(&self, dry_run: bool) -> MigrationResult<PhaseReport> {
        let (source, target) = self.fetch_cases_data().await?;
        let filtered = self.filter_cases(&source, &target);
        if !dry_run {
            self.record_existing(&source, &target);
        }
        let outcome = self.import_cases(&filtered, dry_run).await?;
        Ok(self.finish_phase(dry_run, &source, &target, &filtered, outcome))
    }

    fn prepare_case(&self, case: &Case) -> Result<(i64, AddCaseRequest), ItemFailure> {
        let section_id = self
            .target_for(EntityKind::Sections, case.section_id)
            .or(self.dst_section)
            .ok_or_else(|| {
                ItemFailure::rejected(format!(
                    "no destination section for source section {}",
                    case.section_id
                ))
            })?;

        let mut request = AddCaseRequest::from(case);
        request.custom_steps_separated = self.rewrite_shared_steps(case)?;
        Ok((section_id, request))
    }

    pub(crate) fn rewrite_shared_steps(&self, case: &Case) -> Result<Option<Vec<Step>>, ItemFailure> {
        let Some(steps) = &case.custom_steps_separated else {
            return Ok(None);
        };

        let mapping = self.lock_mapping(EntityKind::SharedSteps);
        let mut rewritten = Vec::with_capacity(steps.len());

        for step in steps {
            let mut step = step.clone();
            if let Some(source_id) = step.shared_step_id {
                match mapping.get_target_by_source(source_id) {
                    Some(target_id) => step.shared_step_id = Some(target_id),
                    None => match self.missing_shared_step {
                        MissingSharedStepPolicy::Keep => {
                            log::warn!(
                                "Case '{}' references unmapped shared step {source_id}, keeping the reference",
                                case.title
                            );
                        }
                        MissingSharedStepPolicy::Drop => {
                            log::warn!(
                                "Case '{}' references unmapped shared step {source_id}, dropping the reference",
                                case.title
                            );
                            step.shared_step_id = None;
                        }
                        MissingSharedStepPolicy::Fail => {
                            return Err(ItemFailure::rejected(format!(
                                "shared step {source_id} has no mapping"
                            )));
                        }
                    },
                }
            }
            rewritten.push(step);
        }

        Ok(Some(rewritten))
    }
}
