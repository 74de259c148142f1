use std::fmt;

use serde::{Deserialize, Serialize};

/// How a target entity came to be paired with its source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MappingStatus {
    /// Created by this tool.
    Created,
    /// Already present in the destination and matched by compare field.
    Existing,
}

impl MappingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Existing => "existing",
        }
    }
}

impl fmt::Display for MappingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
