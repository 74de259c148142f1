use tr_concurrency::ConcurrencyError;
use tr_core::EntityKind;

use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Failed to fetch {kind} from {side} project {project_id}: {message} {location}")]
    Fetch {
        kind: EntityKind,
        side: &'static str,
        project_id: i64,
        message: String,
        location: ErrorLocation,
    },

    #[error(
        "Failed to fetch {kind} from both projects (source: {source_message}; target: {target_message}) {location}"
    )]
    FetchBoth {
        kind: EntityKind,
        source_message: String,
        target_message: String,
        location: ErrorLocation,
    },

    #[error("{kind} import aborted: {message} {location}")]
    Import {
        kind: EntityKind,
        message: String,
        location: ErrorLocation,
    },

    #[error("Mapping I/O error for {path}: {source} {location}")]
    MappingIo {
        path: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Mapping file {path} is neither a full mapping nor a flat id map: {message} {location}")]
    MappingFormat {
        path: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Mapping serialization error: {source} {location}")]
    MappingSerialize {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Invalid migration setup: {message} {location}")]
    Configuration {
        message: String,
        location: ErrorLocation,
    },
}

impl MigrationError {
    #[track_caller]
    pub fn fetch(kind: EntityKind, side: &'static str, project_id: i64, message: String) -> Self {
        MigrationError::Fetch {
            kind,
            side,
            project_id,
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn fetch_both(kind: EntityKind, source_message: String, target_message: String) -> Self {
        MigrationError::FetchBoth {
            kind,
            source_message,
            target_message,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn import(kind: EntityKind, error: ConcurrencyError) -> Self {
        MigrationError::Import {
            kind,
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn mapping_io(path: String, source: std::io::Error) -> Self {
        MigrationError::MappingIo {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        MigrationError::Configuration {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for MigrationError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        MigrationError::MappingSerialize {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, MigrationError>;
