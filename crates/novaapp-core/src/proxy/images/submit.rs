// Image submission stage

use serde::Deserialize;
use serde_json::{json, Value};

use novaapp_types::{Credential, ProxyError};

use crate::proxy::upstream::UpstreamClient;

/// One generated-image task as returned by the submission call.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ImageTask {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl ImageTask {
    /// `(url, prompt)` when both are present and non-empty.
    pub fn parts(&self) -> Result<(&str, &str), ProxyError> {
        match (self.url.as_deref(), self.prompt.as_deref()) {
            (Some(url), Some(prompt)) if !url.is_empty() && !prompt.is_empty() => Ok((url, prompt)),
            _ => Err(ProxyError::InvalidImageTask {
                message: format!("task is missing url or prompt: {:?}", self),
            }),
        }
    }
}

pub(super) async fn submit(
    upstream: &UpstreamClient,
    credential: &Credential,
    model_id: u32,
    prompt: &str,
) -> Result<Vec<ImageTask>, ProxyError> {
    let payload = json!({ "messages": [{ "role": "user", "content": prompt }] });
    let body = upstream.submit_image(credential, model_id, &payload).await?;
    extract_image_tasks(&body)
}

/// Read `data.images` from a submission body; an absent or empty list is an error.
pub fn extract_image_tasks(body: &Value) -> Result<Vec<ImageTask>, ProxyError> {
    let images = body
        .get("data")
        .and_then(|d| d.get("images"))
        .and_then(|i| i.as_array())
        .filter(|arr| !arr.is_empty())
        .ok_or(ProxyError::NoImageTasks)?;

    images
        .iter()
        .map(|task| {
            serde_json::from_value::<ImageTask>(task.clone())
                .map_err(|e| ProxyError::Parse { message: format!("bad image task: {}", e) })
        })
        .collect()
}
