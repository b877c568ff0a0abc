// OpenAI-compatible API handlers

mod chat;
mod images;
mod models;

pub use chat::handle_chat_completions;
pub use images::handle_images_generations;
pub use models::handle_list_models;

// Shared imports for submodules
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{info, warn};

use novaapp_types::ProxyError;

use crate::proxy::server::AppState;

/// OpenAI-shaped error body with the status `ProxyError` maps to.
pub(crate) fn error_response(err: &ProxyError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let error_type = if err.is_client_error() { "invalid_request_error" } else { "upstream_error" };
    (
        status,
        Json(json!({
            "error": {
                "message": err.to_string(),
                "type": error_type,
                "code": status.as_u16(),
            }
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let resp = error_response(&ProxyError::NoImageTasks);
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = error_response(&ProxyError::InvalidRequest { message: "x".to_string() });
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
