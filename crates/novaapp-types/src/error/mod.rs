//! Typed error definitions for the NovaApp adapter.
//!
//! All errors are serializable for API responses, displayable for logging
//! and matchable for error handling logic.

mod config;
mod proxy;

pub use config::ConfigError;
pub use proxy::ProxyError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum TypedError {
    /// Wraps a proxy operation error
    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    /// Wraps a configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Standard Result type using TypedError.
pub type Result<T> = std::result::Result<T, TypedError>;
