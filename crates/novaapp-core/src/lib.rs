//! # NovaApp Core
//!
//! Upstream adapter that exposes an OpenAI-compatible surface over the
//! NovaApp chat and image-generation endpoints.
//!
//! ```text
//! novaapp-core/src/proxy/
//! ├── credential_pool.rs # round-robin vendor account rotation
//! ├── upstream/          # header builder + shared reqwest client
//! ├── mappers/openai/    # vendor SSE -> OpenAI chunk translation
//! ├── images/            # submit / poll / fetch orchestration
//! ├── adapter.rs         # facade owned by the router state
//! ├── handlers/          # axum handlers for /v1/*
//! ├── middleware/        # bearer-key auth
//! └── server.rs          # router assembly
//! ```

#![allow(
    clippy::significant_drop_tightening,
    reason = "Mutex guards in the credential pool are held for an O(1) critical section"
)]
#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

pub mod error;
pub mod modules;
pub mod proxy;

pub use error::{AppError, AppResult};
pub use proxy::{Adapter, CredentialPool};
