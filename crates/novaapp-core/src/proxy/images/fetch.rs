// Asset fetch + encode stage

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;

use novaapp_types::{Credential, ProxyError};

use crate::proxy::upstream::UpstreamClient;

/// Resolve the download token, fetch the bytes and base64-encode them.
pub(super) async fn fetch_as_base64(
    upstream: &UpstreamClient,
    credential: &Credential,
    metadata_url: &str,
) -> Result<String, ProxyError> {
    tracing::info!("[Images] Fetching download token from {}", metadata_url);
    let metadata = upstream.fetch_storage_metadata(credential, metadata_url).await?;
    let token = first_download_token(&metadata)
        .ok_or_else(|| ProxyError::DownloadTokenMissing { url: metadata_url.to_string() })?;

    let url = download_url(metadata_url, token);
    tracing::debug!("[Images] Downloading asset from {}", metadata_url);
    let bytes = upstream.download_asset(credential, &url).await?;
    Ok(STANDARD.encode(&bytes))
}

/// First entry of the comma-separated `downloadTokens` field.
pub fn first_download_token(metadata: &Value) -> Option<&str> {
    metadata
        .get("downloadTokens")
        .and_then(Value::as_str)
        .and_then(|tokens| tokens.split(',').next())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub fn download_url(metadata_url: &str, token: &str) -> String {
    format!("{}?alt=media&token={}", metadata_url, token)
}
