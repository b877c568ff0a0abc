//! Upstream module - vendor headers and the shared HTTP client.

pub mod client;
pub mod headers;

pub use client::UpstreamClient;
pub use headers::{HeaderBuilder, UpstreamOperation, USER_AGENT};
