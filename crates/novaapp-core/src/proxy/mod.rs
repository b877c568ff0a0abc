//! Proxy module - OpenAI-compatible surface over the NovaApp upstream.
//!
//! - Credential rotation across vendor accounts
//! - Chat streaming translation (vendor SSE -> OpenAI SSE)
//! - Image generation orchestration (submit, fan-out poll, fan-out fetch)
//! - axum router, handlers and auth middleware

pub mod adapter;
pub mod common;
pub mod credential_pool;
pub mod handlers;
pub mod images;
pub mod mappers;
pub mod middleware;
pub mod server;
pub mod upstream;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use adapter::Adapter;
pub use credential_pool::CredentialPool;
pub use server::{build_proxy_router, AppState};
