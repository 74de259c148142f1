pub mod client;
pub mod error;
pub mod requests;

pub use client::TestManagementClient;
pub use error::{ClientError, Result as ClientResult};
pub use requests::{AddCaseRequest, AddSectionRequest, AddSharedStepRequest, AddSuiteRequest};
