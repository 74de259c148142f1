use crate::MappingStatus;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingPair {
    pub source_id: i64,
    pub target_id: i64,
    pub created_at: DateTime<Utc>,
    pub status: MappingStatus,
}

impl MappingPair {
    pub fn new(source_id: i64, target_id: i64, status: MappingStatus) -> Self {
        Self {
            source_id,
            target_id,
            created_at: Utc::now(),
            status,
        }
    }
}
