use tr_core::{
    AddCaseRequest, AddSectionRequest, AddSharedStepRequest, AddSuiteRequest, Case, ClientError,
    ClientResult, Section, SharedStep, Suite, TestManagementClient,
};

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use async_trait::async_trait;

pub const FIRST_CREATED_ID: i64 = 500;

/// In-memory client. Entities are keyed by project ID; every create hands out
/// the next ID starting at 500 and is recorded for inspection.
#[derive(Default)]
pub struct StubClient {
    shared_steps: HashMap<i64, Vec<SharedStep>>,
    suites: HashMap<i64, Vec<Suite>>,
    sections: HashMap<i64, Vec<Section>>,
    cases: HashMap<i64, Vec<Case>>,

    failing_fetches: HashSet<(&'static str, i64)>,
    rejected_names: HashSet<String>,
    unreachable_names: HashSet<String>,
    unavailable: bool,
    unavailable_for_first: u32,

    next_id: AtomicI64,
    create_attempts: AtomicU32,
    calls: Mutex<Vec<String>>,
    created_sections: Mutex<Vec<AddSectionRequest>>,
    created_cases: Mutex<Vec<(i64, AddCaseRequest)>>,
}

impl StubClient {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(FIRST_CREATED_ID),
            ..Self::default()
        }
    }

    pub fn with_shared_steps(mut self, project_id: i64, steps: Vec<SharedStep>) -> Self {
        self.shared_steps.insert(project_id, steps);
        self
    }

    pub fn with_suites(mut self, project_id: i64, suites: Vec<Suite>) -> Self {
        self.suites.insert(project_id, suites);
        self
    }

    pub fn with_sections(mut self, project_id: i64, sections: Vec<Section>) -> Self {
        self.sections.insert(project_id, sections);
        self
    }

    pub fn with_cases(mut self, project_id: i64, cases: Vec<Case>) -> Self {
        self.cases.insert(project_id, cases);
        self
    }

    /// `what` is one of `shared_steps`, `suites`, `sections`, `cases`.
    pub fn failing_fetch(mut self, what: &'static str, project_id: i64) -> Self {
        self.failing_fetches.insert((what, project_id));
        self
    }

    /// Creates of an entity with this title/name fail with an API error.
    pub fn rejecting(mut self, name: &str) -> Self {
        self.rejected_names.insert(name.to_string());
        self
    }

    /// Creates of an entity with this title/name fail as unreachable.
    pub fn unreachable_for(mut self, name: &str) -> Self {
        self.unreachable_names.insert(name.to_string());
        self
    }

    /// Every create fails as unreachable.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// The first `attempts` creates fail as unreachable, later ones succeed.
    pub fn unavailable_for_first(mut self, attempts: u32) -> Self {
        self.unavailable_for_first = attempts;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_attempts(&self) -> u32 {
        self.create_attempts.load(Ordering::SeqCst)
    }

    pub fn created_sections(&self) -> Vec<AddSectionRequest> {
        self.created_sections.lock().unwrap().clone()
    }

    pub fn created_cases(&self) -> Vec<(i64, AddCaseRequest)> {
        self.created_cases.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn fetch<T: Clone>(
        &self,
        what: &'static str,
        store: &HashMap<i64, Vec<T>>,
        project_id: i64,
    ) -> ClientResult<Vec<T>> {
        self.record(format!("get_{what}:{project_id}"));
        if self.failing_fetches.contains(&(what, project_id)) {
            return Err(ClientError::api(500, format!("{what} unavailable")));
        }
        Ok(store.get(&project_id).cloned().unwrap_or_default())
    }

    fn create(&self, what: &str, name: &str) -> ClientResult<i64> {
        let attempt = self.create_attempts.fetch_add(1, Ordering::SeqCst);
        self.record(format!("add_{what}:{name}"));

        if self.unavailable
            || attempt < self.unavailable_for_first
            || self.unreachable_names.contains(name)
        {
            return Err(ClientError::unavailable("connection refused"));
        }
        if self.rejected_names.contains(name) {
            return Err(ClientError::api(400, format!("{name} rejected")));
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl TestManagementClient for StubClient {
    async fn get_shared_steps(&self, project_id: i64) -> ClientResult<Vec<SharedStep>> {
        self.fetch("shared_steps", &self.shared_steps, project_id)
    }

    async fn get_suites(&self, project_id: i64) -> ClientResult<Vec<Suite>> {
        self.fetch("suites", &self.suites, project_id)
    }

    async fn get_sections(
        &self,
        project_id: i64,
        _suite_id: Option<i64>,
    ) -> ClientResult<Vec<Section>> {
        self.fetch("sections", &self.sections, project_id)
    }

    async fn get_cases(
        &self,
        project_id: i64,
        _suite_id: Option<i64>,
        _section_id: Option<i64>,
    ) -> ClientResult<Vec<Case>> {
        self.fetch("cases", &self.cases, project_id)
    }

    async fn add_shared_step(
        &self,
        project_id: i64,
        request: &AddSharedStepRequest,
    ) -> ClientResult<SharedStep> {
        let id = self.create("shared_step", &request.title)?;
        let mut step = SharedStep::new(id, &request.title);
        step.project_id = Some(project_id);
        step.custom_steps_separated = request.custom_steps_separated.clone();
        Ok(step)
    }

    async fn add_suite(&self, project_id: i64, request: &AddSuiteRequest) -> ClientResult<Suite> {
        let id = self.create("suite", &request.name)?;
        let mut suite = Suite::new(id, &request.name);
        suite.project_id = Some(project_id);
        Ok(suite)
    }

    async fn add_section(
        &self,
        _project_id: i64,
        request: &AddSectionRequest,
    ) -> ClientResult<Section> {
        let id = self.create("section", &request.name)?;
        self.created_sections.lock().unwrap().push(request.clone());
        let mut section = Section::new(id, &request.name);
        section.parent_id = request.parent_id;
        Ok(section)
    }

    async fn add_case(&self, section_id: i64, request: &AddCaseRequest) -> ClientResult<Case> {
        let id = self.create("case", &request.title)?;
        self.created_cases
            .lock()
            .unwrap()
            .push((section_id, request.clone()));
        let mut case = Case::new(id, &request.title);
        case.section_id = section_id;
        Ok(case)
    }
}
