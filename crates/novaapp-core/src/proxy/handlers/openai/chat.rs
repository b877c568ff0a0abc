// OpenAI chat completions handler
use super::*;

use std::convert::Infallible;

use axum::body::Body;
use axum::http::header;
use futures::StreamExt;

use novaapp_types::protocol::openai::ChatCompletionRequest;

use crate::proxy::mappers::openai::request::requested_model;

/// OpenAI Chat API: POST /v1/chat/completions
///
/// The image model answers with a single `chat.completion` carrying a
/// markdown image; every other model streams SSE.
pub async fn handle_chat_completions(
    State(state): State<AppState>,
    Json(request): Json<ChatCompletionRequest>,
) -> Response {
    let adapter = &state.adapter;
    let model = requested_model(&request, adapter.config());
    info!("[Chat] Received request: model={}, messages={}", model, request.messages.len());

    if adapter.is_image_model(&model) {
        return match adapter.image_chat_completion(&request).await {
            Ok(completion) => Json(completion).into_response(),
            Err(e) => {
                warn!("[Chat] Image request failed: {}", e);
                error_response(&e)
            },
        };
    }

    let frames = adapter.chat_completion(request).map(Ok::<_, Infallible>);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(frames),
    )
        .into_response()
}
