use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of a `custom_steps_separated` list.
///
/// A step either carries its own content or points at a shared step through
/// `shared_step_id`; the latter is project-scoped and must be rewritten when
/// the owning case moves to another project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_step_id: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Step {
    pub fn with_content(content: &str, expected: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            expected: Some(expected.to_string()),
            ..Self::default()
        }
    }

    pub fn shared(shared_step_id: i64) -> Self {
        Self {
            shared_step_id: Some(shared_step_id),
            ..Self::default()
        }
    }
}
