use crate::{
    AddCaseRequest, AddSectionRequest, AddSharedStepRequest, AddSuiteRequest, Case, ClientResult,
    Section, SharedStep, Suite,
};

use std::collections::HashMap;

use async_trait::async_trait;
use futures::{StreamExt, stream};

/// The narrow slice of the test-management API the migration engine needs:
/// list and create, per entity kind.
#[async_trait]
pub trait TestManagementClient: Send + Sync {
    async fn get_shared_steps(&self, project_id: i64) -> ClientResult<Vec<SharedStep>>;

    async fn get_suites(&self, project_id: i64) -> ClientResult<Vec<Suite>>;

    async fn get_sections(
        &self,
        project_id: i64,
        suite_id: Option<i64>,
    ) -> ClientResult<Vec<Section>>;

    async fn get_cases(
        &self,
        project_id: i64,
        suite_id: Option<i64>,
        section_id: Option<i64>,
    ) -> ClientResult<Vec<Case>>;

    async fn add_shared_step(
        &self,
        project_id: i64,
        request: &AddSharedStepRequest,
    ) -> ClientResult<SharedStep>;

    async fn add_suite(&self, project_id: i64, request: &AddSuiteRequest) -> ClientResult<Suite>;

    async fn add_section(
        &self,
        project_id: i64,
        request: &AddSectionRequest,
    ) -> ClientResult<Section>;

    async fn add_case(&self, section_id: i64, request: &AddCaseRequest) -> ClientResult<Case>;

    /// Fetch the suites of several projects with at most `workers` requests in
    /// flight. Each project gets its own result so callers can tolerate
    /// partial failure.
    async fn get_suites_parallel(
        &self,
        project_ids: &[i64],
        workers: usize,
    ) -> HashMap<i64, ClientResult<Vec<Suite>>> {
        stream::iter(project_ids.iter().copied())
            .map(|project_id| async move { (project_id, self.get_suites(project_id).await) })
            .buffer_unordered(workers.max(1))
            .collect()
            .await
    }
}
