//! Adapter facade: one credential pool, one outbound client, three operations.

use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt};

use novaapp_types::protocol::openai::{
    AssistantMessage, ChatCompletion, ChatCompletionRequest, CompletionChoice, ImageData,
    ImageGenerationRequest, ImageGenerationResponse, ModelCard, ModelList, Usage,
    COMPLETION_OBJECT,
};
use novaapp_types::{AdapterConfig, ProxyError};

use super::common::build_http_client;
use super::credential_pool::CredentialPool;
use super::images::ImageOrchestrator;
use super::mappers::openai::request::{build_chat_payload, requested_model};
use super::mappers::openai::stream_formatters::new_stream_id;
use super::mappers::openai::streaming::{create_openai_sse_stream, error_message, ChatTranslator};
use super::upstream::UpstreamClient;
use crate::error::AppResult;

const MODEL_OWNER: &str = "lzA6";

/// Characters of the prompt used as markdown alt text.
const ALT_TEXT_CHARS: usize = 30;

pub struct Adapter {
    config: AdapterConfig,
    credentials: CredentialPool,
    upstream: Arc<UpstreamClient>,
    images: ImageOrchestrator,
    created_at: i64,
}

impl Adapter {
    /// Build with a fresh HTTP client honoring the configured request timeout.
    pub fn new(config: AdapterConfig) -> AppResult<Self> {
        let http_client = build_http_client(config.request_timeout())?;
        Self::with_client(config, http_client)
    }

    /// Build around a caller-supplied client.
    pub fn with_client(config: AdapterConfig, http_client: reqwest::Client) -> AppResult<Self> {
        config.validate_config()?;
        let credentials = CredentialPool::new(config.credentials.clone())?;
        let upstream = Arc::new(UpstreamClient::new(http_client, config.endpoints.clone()));
        let images = ImageOrchestrator::new(
            Arc::clone(&upstream),
            config.polling_interval(),
            config.polling_timeout(),
        );
        tracing::info!("[Credentials] Pool ready with {} credential(s)", credentials.len());
        Ok(Self { config, credentials, upstream, images, created_at: chrono::Utc::now().timestamp() })
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn is_image_model(&self, model: &str) -> bool {
        model == self.config.image_model
    }

    /// Stream OpenAI SSE frames for a chat request.
    ///
    /// Never fails: setup and upstream errors arrive as a final in-band chunk
    /// followed by `[DONE]`.
    pub fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> impl Stream<Item = Bytes> + Send + 'static {
        let model_name = requested_model(&request, &self.config);
        let (payload, model_id) = build_chat_payload(&request, &self.config);
        let credential = self.credentials.next();
        let upstream = Arc::clone(&self.upstream);
        let created = chrono::Utc::now().timestamp();

        async_stream::stream! {
            let mut translator = ChatTranslator::new(new_stream_id(), created, model_name.clone());
            tracing::info!("[Chat] Sending upstream request, model: {} (id: {})", model_name, model_id);

            match upstream.open_chat_stream(&credential, model_id, &payload).await {
                Ok(response) => {
                    translator.begin_streaming();
                    let mut frames = Box::pin(create_openai_sse_stream(response.bytes_stream(), translator));
                    while let Some(frame) = frames.next().await {
                        yield frame;
                    }
                },
                Err(e) => {
                    tracing::error!("[Chat] Upstream request failed: {}", e);
                    for frame in translator.fail(&error_message(&e)) {
                        yield frame;
                    }
                },
            }
        }
    }

    /// Generate images; all-or-nothing.
    pub async fn generate_image(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ProxyError> {
        let prompt = request
            .prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ProxyError::InvalidRequest { message: "'prompt' must not be empty".to_string() })?;

        let model_name = request.model.as_deref().unwrap_or(&self.config.image_model);
        let model_id = self.config.model_id(model_name).ok_or_else(|| ProxyError::InvalidRequest {
            message: format!("unknown image model '{}'", model_name),
        })?;
        let n = request.n.unwrap_or(1).max(1) as usize;

        let credential = self.credentials.next();
        let images = self
            .images
            .generate(credential, model_id, prompt, n)
            .await
            .inspect_err(|e| tracing::error!("[Images] Image generation failed: {}", e))?;

        Ok(ImageGenerationResponse {
            created: chrono::Utc::now().timestamp(),
            data: images.into_iter().map(|b64_json| ImageData { b64_json }).collect(),
        })
    }

    /// Chat request addressed to the image model: one image as a markdown reply.
    pub async fn image_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletion, ProxyError> {
        let model_name = requested_model(request, &self.config);
        let prompt = request.last_user_text().ok_or_else(|| ProxyError::InvalidRequest {
            message: "no user message found in 'messages'".to_string(),
        })?;

        let result = self
            .generate_image(ImageGenerationRequest {
                prompt: Some(prompt.clone()),
                model: Some(model_name.clone()),
                n: Some(1),
            })
            .await?;
        let image = result.data.into_iter().next().ok_or(ProxyError::NoImageTasks)?;

        let alt: String = prompt.chars().take(ALT_TEXT_CHARS).collect();
        Ok(ChatCompletion {
            id: new_stream_id(),
            object: COMPLETION_OBJECT.to_string(),
            created: chrono::Utc::now().timestamp(),
            model: model_name,
            choices: vec![CompletionChoice {
                index: 0,
                message: AssistantMessage {
                    role: "assistant".to_string(),
                    content: format!("![{}](data:image/png;base64,{})", alt, image.b64_json),
                },
                finish_reason: "stop".to_string(),
            }],
            usage: Usage::default(),
        })
    }

    /// One entry per mapped model, in mapping declaration order.
    pub fn list_models(&self) -> ModelList {
        ModelList {
            object: "list".to_string(),
            data: self
                .config
                .model_mapping
                .keys()
                .map(|id| ModelCard {
                    id: id.clone(),
                    object: "model".to_string(),
                    created: self.created_at,
                    owned_by: MODEL_OWNER.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novaapp_types::Credential;

    fn adapter() -> Adapter {
        let config = AdapterConfig {
            credentials: vec![Credential::new("t", "u")],
            ..AdapterConfig::default()
        };
        Adapter::new(config).expect("valid adapter")
    }

    #[test]
    fn test_new_rejects_missing_credentials() {
        assert!(Adapter::new(AdapterConfig::default()).is_err());
    }

    #[test]
    fn test_list_models_is_ordered_and_idempotent() {
        let adapter = adapter();
        let first = adapter.list_models();
        let second = adapter.list_models();
        assert_eq!(first, second);
        assert_eq!(first.object, "list");
        assert_eq!(first.data.len(), 7);
        assert_eq!(first.data[0].id, "gpt-4o-mini");
        assert_eq!(first.data[6].id, "nova-dalle3");
        assert!(first.data.iter().all(|m| m.object == "model" && m.owned_by == "lzA6"));
    }

    #[test]
    fn test_is_image_model() {
        let adapter = adapter();
        assert!(adapter.is_image_model("nova-dalle3"));
        assert!(!adapter.is_image_model("gpt-4o"));
    }

    #[tokio::test]
    async fn test_generate_image_requires_prompt() {
        let err = adapter().generate_image(ImageGenerationRequest::default()).await.unwrap_err();
        assert!(matches!(err, ProxyError::InvalidRequest { .. }));

        let blank = ImageGenerationRequest { prompt: Some("   ".to_string()), ..Default::default() };
        let err = adapter().generate_image(blank).await.unwrap_err();
        assert!(matches!(err, ProxyError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_generate_image_rejects_unknown_model() {
        let req = ImageGenerationRequest {
            prompt: Some("a fox".to_string()),
            model: Some("midjourney".to_string()),
            n: None,
        };
        let err = adapter().generate_image(req).await.unwrap_err();
        assert!(matches!(err, ProxyError::InvalidRequest { ref message } if message.contains("midjourney")));
    }

    #[tokio::test]
    async fn test_image_chat_requires_user_message() {
        let req = ChatCompletionRequest {
            model: Some("nova-dalle3".to_string()),
            messages: vec![novaapp_types::protocol::openai::ChatMessage::new("system", "x")],
            ..Default::default()
        };
        let err = adapter().image_chat_completion(&req).await.unwrap_err();
        assert!(matches!(err, ProxyError::InvalidRequest { .. }));
    }
}
