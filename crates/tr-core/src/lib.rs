pub mod client;
pub mod entity;
pub mod error;
pub mod models;

pub use client::{
    AddCaseRequest, AddSectionRequest, AddSharedStepRequest, AddSuiteRequest, ClientError,
    ClientResult, TestManagementClient,
};
pub use entity::{Entity, normalize};
pub use error::{CoreError, Result as CoreResult};
pub use models::case::Case;
pub use models::entity_kind::EntityKind;
pub use models::missing_shared_step_policy::MissingSharedStepPolicy;
pub use models::section::Section;
pub use models::shared_step::SharedStep;
pub use models::step::Step;
pub use models::suite::Suite;

#[cfg(test)]
mod tests;
