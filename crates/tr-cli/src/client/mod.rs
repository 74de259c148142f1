pub(crate) mod client;
pub(crate) mod page;

pub use client::HttpClient;
