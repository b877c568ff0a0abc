//! Proxy-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the upstream vendor.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ProxyError {
    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {status}: {message}")]
    UpstreamHttp { status: u16, message: String },

    /// Transport failure (connect, TLS, body read)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Upstream body could not be parsed
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Image submission returned no tasks
    #[error("Upstream returned no image tasks")]
    NoImageTasks,

    /// Image task is missing its url or prompt
    #[error("Invalid image task: {message}")]
    InvalidImageTask { message: String },

    /// Image task did not succeed before the polling deadline
    #[error("Polling task {task_url} timed out after {timeout_secs}s")]
    PollTimeout { task_url: String, timeout_secs: u64 },

    /// Storage metadata carried no `downloadTokens`
    #[error("No downloadTokens in metadata at {url}")]
    DownloadTokenMissing { url: String },

    /// Asset download failed
    #[error("Download from {url} failed: {message}")]
    Download { url: String, message: String },

    /// Request validation failed
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Internal proxy error (bugs, unexpected states)
    #[error("Internal proxy error: {message}")]
    Internal { message: String },
}

impl ProxyError {
    /// Check if this is a client error (4xx equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }

    /// Get HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } => 400,
            Self::Internal { .. } => 500,
            Self::UpstreamHttp { .. }
            | Self::Network { .. }
            | Self::Parse { .. }
            | Self::NoImageTasks
            | Self::InvalidImageTask { .. }
            | Self::PollTimeout { .. }
            | Self::DownloadTokenMissing { .. }
            | Self::Download { .. } => 502,
        }
    }
}
