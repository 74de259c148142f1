use crate::HttpClient;
use crate::migrate_commands::{
    MigrateArgs, MigrateTarget, batch_processor, build_migration, circuit_breaker, execute,
    retry_config,
};

use tr_config::Config;
use tr_core::{
    AddCaseRequest, AddSectionRequest, AddSharedStepRequest, AddSuiteRequest, Case, ClientError,
    ClientResult, MissingSharedStepPolicy, Section, SharedStep, Suite, TestManagementClient,
};
use tr_migrate::Mapping;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

fn args() -> MigrateArgs {
    MigrateArgs {
        src_project: 1,
        dst_project: 2,
        src_suite: None,
        dst_suite: None,
        dst_section: None,
        compare_field: None,
        dry_run: true,
        workers: None,
        rpm: None,
        mapping_file: None,
        save_mapping_dir: None,
    }
}

fn client() -> Arc<dyn TestManagementClient> {
    Arc::new(HttpClient::new("http://127.0.0.1:9", "u", "k", Duration::from_secs(1)).unwrap())
}

#[test]
fn given_default_config_when_building_then_config_values_applied() {
    let mut config = Config::default();
    config.migration.missing_shared_step = MissingSharedStepPolicy::Drop;

    let migration = build_migration(&config, &args(), client()).unwrap();

    assert_eq!(migration.src_project(), 1);
    assert_eq!(migration.dst_project(), 2);
    assert_eq!(migration.compare_field(), "title");
    assert_eq!(
        migration.missing_shared_step_policy(),
        MissingSharedStepPolicy::Drop
    );
}

#[test]
fn given_compare_field_flag_when_building_then_flag_wins() {
    let config = Config::default();
    let args = MigrateArgs {
        compare_field: Some("refs".into()),
        ..args()
    };

    let migration = build_migration(&config, &args, client()).unwrap();

    assert_eq!(migration.compare_field(), "refs");
}

#[test]
fn given_zero_workers_flag_when_building_then_rejected() {
    let config = Config::default();
    let args = MigrateArgs {
        workers: Some(0),
        ..args()
    };

    let result = build_migration(&config, &args, client());

    assert!(result.is_err());
}

#[test]
fn given_invalid_project_when_building_then_migration_error_surfaces() {
    let config = Config::default();
    let args = MigrateArgs {
        src_project: -1,
        ..args()
    };

    let Err(err) = build_migration(&config, &args, client()) else {
        panic!("expected a migration error");
    };

    assert!(err.to_string().contains("project IDs must be positive"));
}

#[test]
fn given_retry_disabled_when_converting_then_none() {
    let mut config = Config::default();
    config.retry.enabled = false;

    assert!(retry_config(&config).is_none());
}

#[test]
fn given_retry_settings_when_converting_then_durations_scaled() {
    let mut config = Config::default();
    config.retry.enabled = true;
    config.retry.max_retries = 2;
    config.retry.initial_delay_ms = 250;
    config.retry.max_delay_secs = 4;

    let retry = retry_config(&config).unwrap();

    assert_eq!(retry.max_retries, 2);
    assert_eq!(retry.initial_delay, Duration::from_millis(250));
    assert_eq!(retry.max_delay, Duration::from_secs(4));
}

#[test]
fn given_breaker_settings_when_converting_then_breaker_closed_and_optional() {
    let mut config = Config::default();
    config.circuit_breaker.enabled = true;
    assert!(circuit_breaker(&config).is_some());

    config.circuit_breaker.enabled = false;
    assert!(circuit_breaker(&config).is_none());
}

#[test]
fn given_batch_settings_when_converting_then_batch_size_applied() {
    let mut config = Config::default();
    config.batch.batch_size = 25;

    assert_eq!(batch_processor(&config).batch_size(), 25);
}

/// One source shared step to create; listing cases always fails.
struct CasesDownClient;

#[async_trait]
impl TestManagementClient for CasesDownClient {
    async fn get_shared_steps(&self, project_id: i64) -> ClientResult<Vec<SharedStep>> {
        Ok(match project_id {
            1 => vec![SharedStep::new(10, "Login")],
            _ => Vec::new(),
        })
    }

    async fn get_suites(&self, _project_id: i64) -> ClientResult<Vec<Suite>> {
        Ok(Vec::new())
    }

    async fn get_sections(
        &self,
        _project_id: i64,
        _suite_id: Option<i64>,
    ) -> ClientResult<Vec<Section>> {
        Ok(Vec::new())
    }

    async fn get_cases(
        &self,
        _project_id: i64,
        _suite_id: Option<i64>,
        _section_id: Option<i64>,
    ) -> ClientResult<Vec<Case>> {
        Err(ClientError::api(500, "cases unavailable"))
    }

    async fn add_shared_step(
        &self,
        _project_id: i64,
        request: &AddSharedStepRequest,
    ) -> ClientResult<SharedStep> {
        Ok(SharedStep::new(500, &request.title))
    }

    async fn add_suite(&self, _project_id: i64, request: &AddSuiteRequest) -> ClientResult<Suite> {
        Ok(Suite::new(600, &request.name))
    }

    async fn add_section(
        &self,
        _project_id: i64,
        request: &AddSectionRequest,
    ) -> ClientResult<Section> {
        Ok(Section::new(700, &request.name))
    }

    async fn add_case(&self, _section_id: i64, request: &AddCaseRequest) -> ClientResult<Case> {
        Ok(Case::new(800, &request.title))
    }
}

#[tokio::test]
async fn given_cases_phase_failing_when_running_full_migration_then_shared_step_mapping_saved() {
    // Given: Shared steps succeed before the case fetch fails
    let dir = TempDir::new().unwrap();
    let config = Config::default();
    let args = MigrateArgs {
        dry_run: false,
        save_mapping_dir: Some(dir.path().to_path_buf()),
        ..args()
    };
    let migration = build_migration(&config, &args, Arc::new(CasesDownClient)).unwrap();

    // When
    let result = execute(&migration, &config, MigrateTarget::Full, &args).await;

    // Then: The phase error surfaces and the created pair is on disk
    assert!(result.unwrap_err().to_string().contains("cases unavailable"));
    let files: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let saved = Mapping::load(&files[0]).unwrap();
    assert_eq!(saved.get_target_by_source(10), Some(500));
}
