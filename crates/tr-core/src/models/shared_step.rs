use crate::Step;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedStep {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub custom_steps_separated: Vec<Step>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SharedStep {
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            ..Self::default()
        }
    }
}
