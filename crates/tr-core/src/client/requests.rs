use crate::models::custom_fields;
use crate::{Case, Section, SharedStep, Step, Suite};

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddSharedStepRequest {
    pub title: String,
    pub custom_steps_separated: Vec<Step>,
}

impl From<&SharedStep> for AddSharedStepRequest {
    fn from(step: &SharedStep) -> Self {
        Self {
            title: step.title.clone(),
            custom_steps_separated: step.custom_steps_separated.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddSuiteRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Suite> for AddSuiteRequest {
    fn from(suite: &Suite) -> Self {
        Self {
            name: suite.name.clone(),
            description: suite.description.clone(),
        }
    }
}

/// `suite_id` and `parent_id` are destination-side IDs; the caller rewrites
/// them before submitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddSectionRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

impl AddSectionRequest {
    pub fn from_section(section: &Section, suite_id: Option<i64>, parent_id: Option<i64>) -> Self {
        Self {
            name: section.name.clone(),
            description: section.description.clone(),
            suite_id,
            parent_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddCaseRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_steps_separated: Option<Vec<Step>>,

    #[serde(flatten)]
    pub custom_fields: Map<String, Value>,
}

impl From<&Case> for AddCaseRequest {
    fn from(case: &Case) -> Self {
        Self {
            title: case.title.clone(),
            template_id: case.template_id,
            type_id: case.type_id,
            priority_id: case.priority_id,
            estimate: case.estimate.clone(),
            refs: case.refs.clone(),
            custom_steps_separated: case.custom_steps_separated.clone(),
            custom_fields: custom_fields(&case.extra),
        }
    }
}
