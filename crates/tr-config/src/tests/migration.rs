use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err};
use serial_test::serial;
use tr_core::MissingSharedStepPolicy;

// =========================================================================
// Validation Tests - Migration
// =========================================================================

#[test]
#[serial]
fn given_blank_compare_field_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _field = EnvGuard::set("TR_COMPARE_FIELD", "   ");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("compare_field"));
}

#[test]
#[serial]
fn given_unknown_policy_in_env_when_load_then_default_kept() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _policy = EnvGuard::set("TR_MISSING_SHARED_STEP", "explode");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(
        config.migration.missing_shared_step,
        eq(MissingSharedStepPolicy::Keep)
    );
}
