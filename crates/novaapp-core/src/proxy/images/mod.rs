//! Image generation orchestration.
//!
//! ```text
//! submit ──► select first n ──► poll (one task per image) ──► fetch + encode (one task per image)
//! ```
//!
//! Both fan-out stages join on every task and keep submission order. The first
//! failing task aborts its siblings and fails the whole request; partial image
//! lists are never returned.

mod fetch;
mod poll;
mod submit;

pub use fetch::{download_url, first_download_token};
pub use poll::metadata_url;
pub use submit::{extract_image_tasks, ImageTask};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use novaapp_types::{Credential, ProxyError};
use tokio::task::JoinSet;

use crate::proxy::upstream::UpstreamClient;

pub struct ImageOrchestrator {
    upstream: Arc<UpstreamClient>,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl ImageOrchestrator {
    pub fn new(upstream: Arc<UpstreamClient>, poll_interval: Duration, poll_timeout: Duration) -> Self {
        Self { upstream, poll_interval, poll_timeout }
    }

    /// Run the full pipeline and return one base64 payload per task, in task order.
    pub async fn generate(
        &self,
        credential: Arc<Credential>,
        model_id: u32,
        prompt: &str,
        n: usize,
    ) -> Result<Vec<String>, ProxyError> {
        tracing::info!("[Images] Submitting image task, prompt: '{:.50}'", prompt);
        let tasks = submit::submit(&self.upstream, &credential, model_id, prompt).await?;
        let selected: Vec<ImageTask> = tasks.into_iter().take(n.max(1)).collect();

        tracing::info!("[Images] Polling {} image task(s) concurrently", selected.len());
        let upstream = Arc::clone(&self.upstream);
        let cred = Arc::clone(&credential);
        let (interval, timeout) = (self.poll_interval, self.poll_timeout);
        let metadata_urls = fan_out(selected, move |task| {
            let upstream = Arc::clone(&upstream);
            let cred = Arc::clone(&cred);
            async move { poll::poll_until_ready(&upstream, &cred, &task, interval, timeout).await }
        })
        .await?;

        tracing::info!("[Images] Downloading {} image(s) as base64", metadata_urls.len());
        let upstream = Arc::clone(&self.upstream);
        let images = fan_out(metadata_urls, move |url| {
            let upstream = Arc::clone(&upstream);
            let cred = Arc::clone(&credential);
            async move { fetch::fetch_as_base64(&upstream, &cred, &url).await }
        })
        .await?;

        tracing::info!("[Images] Base64 conversion complete for {} image(s)", images.len());
        Ok(images)
    }
}

/// Spawn one task per item, join all, keep input order.
///
/// The first error aborts the remaining tasks and is returned.
pub async fn fan_out<I, T, F, Fut>(items: Vec<I>, make: F) -> Result<Vec<T>, ProxyError>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, ProxyError>> + Send + 'static,
{
    let total = items.len();
    let mut set = JoinSet::new();
    for (idx, item) in items.into_iter().enumerate() {
        let fut = make(item);
        set.spawn(async move { (idx, fut.await) });
    }

    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, Ok(value))) => slots[idx] = Some(value),
            Ok((idx, Err(e))) => {
                tracing::error!("[Images] Task {} failed: {}", idx, e);
                set.abort_all();
                return Err(e);
            },
            Err(e) => {
                set.abort_all();
                return Err(ProxyError::Internal { message: format!("task join error: {}", e) });
            },
        }
    }

    slots
        .into_iter()
        .collect::<Option<Vec<T>>>()
        .ok_or_else(|| ProxyError::Internal { message: "fan-out finished with empty slots".to_string() })
}
