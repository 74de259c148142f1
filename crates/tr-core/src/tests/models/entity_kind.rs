use crate::EntityKind;

use std::str::FromStr;

#[test]
fn test_entity_kind_as_str() {
    assert_eq!(EntityKind::SharedSteps.as_str(), "shared_steps");
    assert_eq!(EntityKind::Suites.as_str(), "suites");
    assert_eq!(EntityKind::Sections.as_str(), "sections");
    assert_eq!(EntityKind::Cases.as_str(), "cases");
}

#[test]
fn test_entity_kind_from_str() {
    assert_eq!(
        EntityKind::from_str("shared-steps").unwrap(),
        EntityKind::SharedSteps
    );
    assert_eq!(
        EntityKind::from_str("shared_steps").unwrap(),
        EntityKind::SharedSteps
    );
    assert_eq!(EntityKind::from_str("cases").unwrap(), EntityKind::Cases);
    assert!(EntityKind::from_str("milestones").is_err());
}
