use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::proxy::server::AppState;

/// Bearer check against the master key; a no-op when no key is configured.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let method = request.method().clone();
    let path = request.uri().path();

    if is_health_check(path) {
        tracing::trace!("Heartbeat/Health: {} {}", method, path);
        return Ok(next.run(request).await);
    }
    tracing::info!("Request: {} {}", method, path);

    if method == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let Some(expected) = state.adapter.config().effective_api_key() else {
        return Ok(next.run(request).await);
    };

    let Some(provided) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(strip_bearer)
    else {
        tracing::warn!("Missing bearer token for {}", path);
        return Err(StatusCode::UNAUTHORIZED);
    };

    if constant_time_compare(provided.trim(), expected) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Invalid API key for {}", path);
        Err(StatusCode::FORBIDDEN)
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Token after a `Bearer ` scheme, matched case-insensitively.
fn strip_bearer(value: &str) -> Option<&str> {
    const SCHEME: &str = "bearer ";
    let scheme = value.get(..SCHEME.len())?;
    scheme.eq_ignore_ascii_case(SCHEME).then(|| &value[SCHEME.len()..])
}

fn is_health_check(path: &str) -> bool {
    path == "/healthz" || path == "/health"
}
