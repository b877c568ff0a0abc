//! # NovaApp Types
//!
//! Core types, models, and error definitions for the NovaApp adapter.
//!
//! - **`error`** - Typed error hierarchy for configuration and proxy operations
//! - **`models`** - Domain models (Credential, AdapterConfig)
//! - **`protocol`** - OpenAI-compatible request/response records
//!
//! ## Architecture Role
//!
//! ```text
//!          novaapp-types (this crate)
//!                  │
//!                  ▼
//!            novaapp-core
//!                  │
//!                  ▼
//!           novaapp-server
//! ```

pub mod error;
pub mod models;
pub mod protocol;

pub use error::{ConfigError, ProxyError, Result, TypedError};
pub use models::{AdapterConfig, Credential, UpstreamEndpoints};
