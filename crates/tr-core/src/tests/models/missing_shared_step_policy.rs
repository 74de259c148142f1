use crate::MissingSharedStepPolicy;

use std::str::FromStr;

#[test]
fn test_policy_default_is_keep() {
    assert_eq!(
        MissingSharedStepPolicy::default(),
        MissingSharedStepPolicy::Keep
    );
}

#[test]
fn test_policy_from_str_is_case_insensitive() {
    assert_eq!(
        MissingSharedStepPolicy::from_str("DROP").unwrap(),
        MissingSharedStepPolicy::Drop
    );
    assert_eq!(
        MissingSharedStepPolicy::from_str("fail").unwrap(),
        MissingSharedStepPolicy::Fail
    );
}

#[test]
fn test_policy_from_str_rejects_unknown() {
    let err = MissingSharedStepPolicy::from_str("ignore").unwrap_err();
    assert!(err.to_string().contains("ignore"));
}
