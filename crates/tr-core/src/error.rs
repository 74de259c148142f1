use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid entity kind: {value} {location}")]
    InvalidEntityKind {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid missing shared step policy: {value} (expected keep, drop or fail) {location}")]
    InvalidMissingSharedStepPolicy {
        value: String,
        location: ErrorLocation,
    },
}

pub type Result<T> = StdResult<T, CoreError>;
