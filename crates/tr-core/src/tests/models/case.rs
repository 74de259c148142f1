use crate::{Case, Step};

use serde_json::json;

#[test]
fn given_case_json_with_unknown_fields_when_deserialized_then_extras_are_kept() {
    // Given
    let value = json!({
        "id": 7,
        "title": "Checkout",
        "section_id": 3,
        "created_on": 1704067200,
        "custom_preconds": "Logged in",
        "custom_steps_separated": [
            {"content": "Open cart", "expected": "Cart shown"},
            {"shared_step_id": 42}
        ]
    });

    // When
    let case: Case = serde_json::from_value(value).unwrap();

    // Then
    assert_eq!(case.section_id, 3);
    assert_eq!(case.extra["custom_preconds"], "Logged in");
    assert_eq!(case.extra["created_on"], 1704067200);
    assert_eq!(case.shared_step_ids(), vec![42]);
}

#[test]
fn given_case_without_steps_when_listing_shared_refs_then_empty() {
    let case = Case::new(1, "No steps");

    assert!(case.shared_step_ids().is_empty());
}

#[test]
fn given_steps_when_listing_shared_refs_then_only_shared_ones_returned() {
    let mut case = Case::new(1, "Mixed");
    case.custom_steps_separated = Some(vec![
        Step::with_content("a", "b"),
        Step::shared(5),
        Step::shared(9),
    ]);

    assert_eq!(case.shared_step_ids(), vec![5, 9]);
}
