//! Shared helpers for the upstream client and stream mappers.

pub mod client_builder;
pub mod sse_parser;

pub use client_builder::build_http_client;
