mod common;

use common::stub_client::FIRST_CREATED_ID;
use common::{DST_PROJECT, SRC_PROJECT, StubClient, migration_builder};

use tr_core::{Case, SharedStep, Step};
use tr_migrate::{Mapping, MappingStatus, MigrationError};

use std::fs;
use std::sync::Arc;

use googletest::prelude::*;
use tempfile::TempDir;

#[tokio::test]
async fn given_created_shared_steps_when_saving_mapping_then_file_reloads_with_same_pairs() {
    // Given: Two shared steps created in the target
    let stub = Arc::new(StubClient::new().with_shared_steps(
        SRC_PROJECT,
        vec![SharedStep::new(20, "Logout"), SharedStep::new(10, "Login")],
    ));
    let migration = migration_builder(&stub).workers(1).build().unwrap();
    migration.migrate_shared_steps(false).await.unwrap();
    let dir = TempDir::new().unwrap();

    // When
    let path = migration.save_mapping(dir.path()).unwrap().unwrap();

    // Then
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert_that!(file_name, starts_with("mapping_"));
    assert_that!(file_name, ends_with(".json"));

    let loaded = Mapping::load(&path).unwrap();
    assert_that!(loaded.count(), eq(2));
    assert_that!(loaded.src_project_id(), eq(SRC_PROJECT));
    let sources: Vec<i64> = loaded.pairs().iter().map(|pair| pair.source_id).collect();
    assert_that!(sources, eq(&vec![10, 20]));
    assert!(loaded
        .pairs()
        .iter()
        .all(|pair| pair.status == MappingStatus::Created));
}

#[tokio::test]
async fn given_nothing_migrated_when_saving_mapping_then_no_file_written() {
    let stub = Arc::new(StubClient::new());
    let migration = migration_builder(&stub).build().unwrap();
    let dir = TempDir::new().unwrap();

    let saved = migration.save_mapping(dir.path()).unwrap();

    assert_that!(saved, none());
    assert_that!(fs::read_dir(dir.path()).unwrap().count(), eq(0));
}

#[tokio::test]
async fn given_missing_directory_when_saving_mapping_then_directory_created() {
    let stub = Arc::new(
        StubClient::new().with_shared_steps(SRC_PROJECT, vec![SharedStep::new(1, "Step")]),
    );
    let migration = migration_builder(&stub).build().unwrap();
    migration.migrate_shared_steps(false).await.unwrap();
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("runs").join("latest");

    let path = migration.save_mapping(&nested).unwrap().unwrap();

    assert!(path.starts_with(&nested));
    assert!(path.exists());
}

#[tokio::test]
async fn given_legacy_flat_mapping_when_loaded_then_cases_use_it_for_shared_steps() {
    // Given: A legacy file mapping shared step 10 to 700
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(&path, r#"{"10": 700, "11": 701}"#).unwrap();

    let mut case = Case::new(100, "Checkout");
    case.section_id = 7;
    case.custom_steps_separated = Some(vec![Step::shared(10)]);
    let stub = Arc::new(StubClient::new());
    let migration = migration_builder(&stub).dst_section(Some(5)).build().unwrap();

    // When
    let loaded = migration.load_mapping_from_file(&path).unwrap();
    let outcome = migration.import_cases(&[case], false).await.unwrap();

    // Then
    assert_that!(loaded, eq(2));
    assert_that!(
        migration.shared_step_mapping().pairs()[0].status,
        eq(MappingStatus::Existing)
    );
    assert_that!(outcome.imported, eq(1));
    let (_, request) = &stub.created_cases()[0];
    let steps = request.custom_steps_separated.as_ref().unwrap();
    assert_that!(steps[0].shared_step_id, some(eq(700)));
}

#[tokio::test]
async fn given_loaded_mapping_when_migrating_shared_steps_then_loaded_pairs_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(&path, r#"{"10": 700}"#).unwrap();
    let stub = Arc::new(StubClient::new().with_shared_steps(
        SRC_PROJECT,
        vec![SharedStep::new(10, "Login"), SharedStep::new(11, "Logout")],
    ));
    let migration = migration_builder(&stub).workers(1).build().unwrap();
    migration.load_mapping_from_file(&path).unwrap();

    migration.migrate_shared_steps(false).await.unwrap();

    let mapping = migration.shared_step_mapping();
    assert_that!(mapping.count(), eq(2));
    assert_that!(mapping.get_target_by_source(10), some(eq(700)));
    assert_that!(mapping.get_target_by_source(11), some(eq(FIRST_CREATED_ID + 1)));
}

#[tokio::test]
async fn given_two_saves_in_quick_succession_when_saving_mapping_then_both_files_kept() {
    let stub = Arc::new(
        StubClient::new().with_shared_steps(SRC_PROJECT, vec![SharedStep::new(1, "Step")]),
    );
    let migration = migration_builder(&stub).build().unwrap();
    migration.migrate_shared_steps(false).await.unwrap();
    let dir = TempDir::new().unwrap();

    let first = migration.save_mapping(dir.path()).unwrap().unwrap();
    let second = migration.save_mapping(dir.path()).unwrap().unwrap();

    assert_that!(first, not(eq(&second)));
    assert_that!(fs::read_dir(dir.path()).unwrap().count(), eq(2));
}

#[test]
fn given_legacy_flat_mapping_when_loaded_and_saved_then_projects_filled_in() {
    // Given: A flat file carries no project IDs
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(&path, r#"{"10": 700}"#).unwrap();
    let stub = Arc::new(StubClient::new());
    let migration = migration_builder(&stub).build().unwrap();

    // When
    migration.load_mapping_from_file(&path).unwrap();
    let saved = migration
        .save_mapping(&dir.path().join("out"))
        .unwrap()
        .unwrap();

    // Then: The migration's projects are recorded
    let reloaded = Mapping::load(&saved).unwrap();
    assert_that!(reloaded.src_project_id(), eq(SRC_PROJECT));
    assert_that!(reloaded.dst_project_id(), eq(DST_PROJECT));
    assert_that!(reloaded.get_target_by_source(10), some(eq(700)));
}

#[test]
fn given_unreadable_mapping_when_loading_then_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "[1, 2, 3]").unwrap();
    let stub = Arc::new(StubClient::new());
    let migration = migration_builder(&stub).build().unwrap();

    let err = migration.load_mapping_from_file(&path).unwrap_err();

    assert!(matches!(err, MigrationError::MappingFormat { .. }));
    assert_that!(err.to_string(), contains_substring("broken.json"));
}

#[test]
fn given_missing_mapping_file_when_loading_then_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let result = Mapping::load(&path);

    assert!(matches!(result, Err(MigrationError::MappingIo { .. })));
}
