//! Shared outbound client for every vendor call.

use bytes::Bytes;
use reqwest::{Client, Response};
use serde_json::Value;

use novaapp_types::{Credential, ProxyError, UpstreamEndpoints};

use super::headers::{HeaderBuilder, UpstreamOperation};
use crate::error::AppError;

/// Longest slice of an upstream error body carried into error messages.
const MAX_ERROR_BODY_CHARS: usize = 512;

pub struct UpstreamClient {
    http_client: Client,
    endpoints: UpstreamEndpoints,
    headers: HeaderBuilder,
}

impl UpstreamClient {
    /// Wrap a pre-built `reqwest::Client`; connections are reused across requests.
    pub fn new(http_client: Client, endpoints: UpstreamEndpoints) -> Self {
        let headers = HeaderBuilder::from_endpoints(&endpoints);
        Self { http_client, endpoints, headers }
    }

    pub fn endpoints(&self) -> &UpstreamEndpoints {
        &self.endpoints
    }

    /// POST the chat payload and return the still-unread streaming response.
    pub async fn open_chat_stream(
        &self,
        credential: &Credential,
        model_id: u32,
        payload: &Value,
    ) -> Result<Response, ProxyError> {
        let headers = self.headers.build(UpstreamOperation::ChatSubmit, credential, model_id)?;
        let response = self
            .http_client
            .post(&self.endpoints.chat_url)
            .headers(headers)
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        tracing::info!("[Chat] Upstream response status: {}", response.status());
        ensure_success(response).await
    }

    /// Submit an image prompt; returns the parsed submission body.
    pub async fn submit_image(
        &self,
        credential: &Credential,
        model_id: u32,
        payload: &Value,
    ) -> Result<Value, ProxyError> {
        let headers = self.headers.build(UpstreamOperation::ImageSubmit, credential, model_id)?;
        let response = self
            .http_client
            .post(&self.endpoints.image_submit_url)
            .headers(headers)
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(ensure_success(response).await?).await
    }

    /// One poll attempt for an image task.
    pub async fn poll_image(
        &self,
        credential: &Credential,
        payload: &Value,
    ) -> Result<Value, ProxyError> {
        let headers = self.headers.build(UpstreamOperation::ImagePoll, credential, 0)?;
        let response = self
            .http_client
            .post(&self.endpoints.image_poll_url)
            .headers(headers)
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(ensure_success(response).await?).await
    }

    /// GET the storage object's metadata document.
    pub async fn fetch_storage_metadata(
        &self,
        credential: &Credential,
        metadata_url: &str,
    ) -> Result<Value, ProxyError> {
        let headers = self.headers.storage(credential)?;
        let response = self
            .http_client
            .get(metadata_url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| download_error(metadata_url, e))?;
        read_json(ensure_success(response).await?).await
    }

    /// GET the raw asset bytes.
    pub async fn download_asset(
        &self,
        credential: &Credential,
        download_url: &str,
    ) -> Result<Bytes, ProxyError> {
        let headers = self.headers.storage(credential)?;
        let response = self
            .http_client
            .get(download_url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| download_error(download_url, e))?;
        let response = ensure_success(response).await.map_err(|e| ProxyError::Download {
            url: download_url.to_string(),
            message: e.to_string(),
        })?;
        response.bytes().await.map_err(|e| download_error(download_url, e))
    }
}

fn transport_error(e: reqwest::Error) -> ProxyError {
    AppError::from(e).into_proxy_error()
}

fn download_error(url: &str, e: reqwest::Error) -> ProxyError {
    ProxyError::Download { url: url.to_string(), message: e.to_string() }
}

/// Pass through 2xx responses; anything else becomes `UpstreamHttp` with a body excerpt.
pub async fn ensure_success(response: Response) -> Result<Response, ProxyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    Err(ProxyError::UpstreamHttp { status: status.as_u16(), message })
}

async fn read_json(response: Response) -> Result<Value, ProxyError> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::from(e).into_proxy_error())
}
