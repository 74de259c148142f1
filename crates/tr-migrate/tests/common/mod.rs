#![allow(dead_code)]

pub mod fixtures;
pub mod stub_client;

pub use fixtures::*;
pub use stub_client::StubClient;
