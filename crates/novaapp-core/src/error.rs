//! Unified error types for NovaApp Core.

use novaapp_types::{ConfigError, ProxyError};
use serde::Serialize;
use thiserror::Error;

/// Main error type for all adapter operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Network request failed (HTTP client).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Upstream call or translation failed.
    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),
}

impl AppError {
    /// Fold transport/parse failures into the typed proxy taxonomy.
    pub fn into_proxy_error(self) -> ProxyError {
        match self {
            Self::Proxy(e) => e,
            Self::Network(e) => match e.status() {
                Some(status) => {
                    ProxyError::UpstreamHttp { status: status.as_u16(), message: e.to_string() }
                },
                None => ProxyError::Network { message: e.to_string() },
            },
            Self::Json(e) => ProxyError::Parse { message: e.to_string() },
            Self::Io(e) => ProxyError::Network { message: e.to_string() },
            Self::Config(e) => ProxyError::Internal { message: e.to_string() },
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for adapter operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_maps_to_parse() {
        let err = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let proxy = AppError::from(err).into_proxy_error();
        assert!(matches!(proxy, ProxyError::Parse { .. }));
    }

    #[test]
    fn test_proxy_error_passes_through() {
        let proxy = AppError::from(ProxyError::NoImageTasks).into_proxy_error();
        assert_eq!(proxy, ProxyError::NoImageTasks);
    }

    #[test]
    fn test_serializes_as_message() {
        let err = AppError::from(ProxyError::NoImageTasks);
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Proxy error: Upstream returned no image tasks\"");
    }
}
