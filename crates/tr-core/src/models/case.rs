use crate::Step;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: i64,
    pub title: String,

    // Placement
    #[serde(default)]
    pub section_id: i64,
    #[serde(default)]
    pub suite_id: Option<i64>,

    // Classification
    #[serde(default)]
    pub template_id: Option<i64>,
    #[serde(default)]
    pub type_id: Option<i64>,
    #[serde(default)]
    pub priority_id: Option<i64>,
    #[serde(default)]
    pub estimate: Option<String>,
    #[serde(default)]
    pub refs: Option<String>,

    #[serde(default)]
    pub custom_steps_separated: Option<Vec<Step>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Case {
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// IDs of every shared step referenced from this case's steps.
    pub fn shared_step_ids(&self) -> Vec<i64> {
        self.custom_steps_separated
            .iter()
            .flatten()
            .filter_map(|step| step.shared_step_id)
            .collect()
    }
}
