// Image polling stage

use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::Instant;

use novaapp_types::{Credential, ProxyError};

use super::submit::ImageTask;
use crate::proxy::upstream::UpstreamClient;

/// Poll one task until `isSuccess` or until `timeout` has elapsed since its first attempt.
///
/// Transport and HTTP failures are logged and retried; only the deadline ends the loop.
/// Each attempt is bounded by the time left before the deadline.
pub(super) async fn poll_until_ready(
    upstream: &UpstreamClient,
    credential: &Credential,
    task: &ImageTask,
    interval: Duration,
    timeout: Duration,
) -> Result<String, ProxyError> {
    let (task_url, prompt) = task.parts()?;
    let payload = json!({ "prompt": prompt, "url": task_url });
    let storage_base = &upstream.endpoints().storage_base_url;

    let started = Instant::now();
    while started.elapsed() < timeout {
        let remaining = timeout.saturating_sub(started.elapsed());
        let Ok(attempt) = tokio::time::timeout(remaining, upstream.poll_image(credential, &payload)).await
        else {
            tracing::warn!("[Images] Poll attempt for task {} ran past the deadline", task_url);
            break;
        };
        match attempt {
            Ok(body) => match ready_path(&body) {
                Ok(Some(relative_path)) => {
                    let url = metadata_url(storage_base, relative_path);
                    tracing::info!("[Images] Task {} succeeded, metadata URL: {}", task_url, url);
                    return Ok(url);
                },
                Ok(None) => tracing::debug!("[Images] Task {} not ready yet", task_url),
                Err(e) => tracing::warn!("[Images] Polling task {} failed: {}", task_url, e),
            },
            Err(e) => tracing::warn!("[Images] Polling task {} failed: {}", task_url, e),
        }
        tokio::time::sleep(interval.min(timeout.saturating_sub(started.elapsed()))).await;
    }

    Err(ProxyError::PollTimeout { task_url: task_url.to_string(), timeout_secs: ceil_secs(timeout) })
}

/// Whole seconds, rounded up so sub-second deadlines never report as 0.
fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

/// `Some(path)` once the task reports success.
fn ready_path(body: &Value) -> Result<Option<&str>, ProxyError> {
    if !body.get("isSuccess").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(None);
    }
    body.get("url")
        .and_then(Value::as_str)
        .map(Some)
        .ok_or_else(|| ProxyError::Parse { message: "successful poll response has no url".to_string() })
}

/// Storage base plus the fully percent-escaped relative path.
pub fn metadata_url(storage_base: &str, relative_path: &str) -> String {
    format!("{}{}", storage_base, urlencoding::encode(relative_path))
}
