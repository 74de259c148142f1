use crate::{CoreError, CoreResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// What case import does with a step whose `shared_step_id` has no entry in
/// the shared-step mapping.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingSharedStepPolicy {
    /// Leave the source ID in place and log a warning.
    #[default]
    Keep,
    /// Strip the reference, keeping the rest of the step.
    Drop,
    /// Refuse to import the case; it is reported as a failed item.
    Fail,
}

impl MissingSharedStepPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Drop => "drop",
            Self::Fail => "fail",
        }
    }
}

impl FromStr for MissingSharedStepPolicy {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "drop" => Ok(Self::Drop),
            "fail" => Ok(Self::Fail),
            _ => Err(CoreError::InvalidMissingSharedStepPolicy {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
