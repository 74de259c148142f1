//! Cross-project migration engine: fetch, filter and import test-management
//! entities from one project into another, recording a durable source to
//! target ID mapping along the way.

pub mod error;
pub mod mapping;
pub mod metrics;
pub mod migration;
pub mod report;

pub use error::{MigrationError, Result as MigrationResult};
pub use mapping::{Mapping, MappingPair, MappingStatus};
pub use metrics::MigrationMetrics;
pub use migration::{Migration, MigrationBuilder, filter_entities, matched_pairs};
pub use report::{ImportOutcome, MigrationReport, PhaseReport};
