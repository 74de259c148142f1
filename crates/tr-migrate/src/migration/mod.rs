pub mod builder;
pub mod filter;
pub mod migration;

mod cases;
mod fetch;
mod import;
pub(crate) mod sections;
mod shared_steps;
mod suites;

pub use builder::MigrationBuilder;
pub use filter::{filter_entities, matched_pairs};
pub use migration::Migration;
