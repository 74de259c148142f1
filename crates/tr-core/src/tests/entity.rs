use crate::{Case, Entity, EntityKind, Section, SharedStep, Suite, normalize};

use proptest::prelude::*;
use serde_json::json;

// =========================================================================
// Compare field resolution
// =========================================================================

#[test]
fn given_title_field_when_resolving_on_suite_then_name_is_used() {
    let suite = Suite::new(1, "Regression");

    assert_eq!(suite.compare_value("title"), Some("Regression"));
    assert_eq!(suite.compare_value("name"), Some("Regression"));
}

#[test]
fn given_name_field_when_resolving_on_case_then_title_is_used() {
    let case = Case::new(1, "Login works");

    assert_eq!(case.compare_value("name"), Some("Login works"));
}

#[test]
fn given_custom_field_when_resolving_then_extra_payload_is_used() {
    let mut step = SharedStep::new(3, "Login");
    step.extra.insert("custom_key".into(), json!("LOGIN-1"));
    step.extra.insert("custom_number".into(), json!(12));

    assert_eq!(step.compare_value("custom_key"), Some("LOGIN-1"));
    assert_eq!(step.compare_value("custom_number"), None);
    assert_eq!(step.compare_value("missing"), None);
}

#[test]
fn given_section_without_description_when_resolving_description_then_none() {
    let section = Section::new(1, "Auth");

    assert_eq!(section.compare_value("description"), None);
}

#[test]
fn test_entity_kinds() {
    assert_eq!(SharedStep::KIND, EntityKind::SharedSteps);
    assert_eq!(Suite::KIND, EntityKind::Suites);
    assert_eq!(Section::KIND, EntityKind::Sections);
    assert_eq!(Case::KIND, EntityKind::Cases);
}

// =========================================================================
// Normalisation
// =========================================================================

#[test]
fn given_padded_mixed_case_when_normalized_then_trimmed_lowercase() {
    assert_eq!(normalize("  Login Page \t"), "login page");
}

proptest! {
    #[test]
    fn given_any_text_when_normalized_twice_then_stable(input in "[a-zA-Z0-9 \\t_-]{0,40}") {
        let once = normalize(&input);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn given_surrounding_whitespace_when_normalized_then_ignored(
        core in "[a-zA-Z0-9]{1,20}",
        left in r"[ \t]{0,5}",
        right in r"[ \t]{0,5}",
    ) {
        let padded = format!("{left}{core}{right}");
        prop_assert_eq!(normalize(&padded), core.to_lowercase());
    }
}
