use crate::{CoreError, CoreResult};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// The entity kinds a migration moves, in no particular order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    SharedSteps,
    Suites,
    Sections,
    Cases,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SharedSteps => "shared_steps",
            Self::Suites => "suites",
            Self::Sections => "sections",
            Self::Cases => "cases",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "shared_steps" | "shared-steps" => Ok(Self::SharedSteps),
            "suites" => Ok(Self::Suites),
            "sections" => Ok(Self::Sections),
            "cases" => Ok(Self::Cases),
            _ => Err(CoreError::InvalidEntityKind {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
