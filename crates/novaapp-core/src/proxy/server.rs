use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::adapter::Adapter;
use super::handlers;

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<Adapter>,
}

/// OpenAI-compatible routes behind the bearer check.
///
/// Access tracing is left to the caller that assembles the full application.
pub fn build_proxy_router(adapter: Arc<Adapter>) -> Router<()> {
    let state = AppState { adapter };

    Router::new()
        .route("/v1/models", get(handlers::openai::handle_list_models))
        .route("/v1/chat/completions", post(handlers::openai::handle_chat_completions))
        .route("/v1/images/generations", post(handlers::openai::handle_images_generations))
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            super::middleware::auth_middleware,
        ))
        .with_state(state)
}
