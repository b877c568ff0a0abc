use std::path::Path;
use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use novaapp_core::proxy::build_proxy_router;
use novaapp_core::Adapter;

/// Proxy routes, public health checks and the static test UI.
pub fn build_router(adapter: Arc<Adapter>, static_dir: &Path) -> Router {
    let index_path = static_dir.join("index.html");

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route_service("/", ServeFile::new(&index_path))
        .nest_service("/static", ServeDir::new(static_dir));

    public_routes
        .merge(build_proxy_router(adapter))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, axum::Json(serde_json::json!({"status": "ok"})))
}
