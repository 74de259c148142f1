use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConcurrencyError {
    #[error("Rate limiter wait timed out after {waited:?} {location}")]
    RateLimitTimeout {
        waited: Duration,
        location: ErrorLocation,
    },

    #[error("batch [{start}..{end}) failed after {attempts} attempts: {message} {location}")]
    BatchFailed {
        start: usize,
        end: usize,
        attempts: u32,
        message: String,
        location: ErrorLocation,
    },
}

impl ConcurrencyError {
    #[track_caller]
    pub fn rate_limit_timeout(waited: Duration) -> Self {
        ConcurrencyError::RateLimitTimeout {
            waited,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn batch_failed(start: usize, end: usize, attempts: u32, message: String) -> Self {
        ConcurrencyError::BatchFailed {
            start,
            end,
            attempts,
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConcurrencyError>;
