//! Core domain models for the NovaApp adapter.

mod config;
mod credential;

pub use config::{AdapterConfig, UpstreamEndpoints};
pub use credential::Credential;
