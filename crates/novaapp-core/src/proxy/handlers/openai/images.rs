// OpenAI images handler (DALL-E compatible)
use super::*;

use novaapp_types::protocol::openai::ImageGenerationRequest;

/// OpenAI Images API: POST /v1/images/generations
pub async fn handle_images_generations(
    State(state): State<AppState>,
    Json(request): Json<ImageGenerationRequest>,
) -> Response {
    info!(
        "[Images] Received request: model={}, prompt={:.50}, n={}",
        request.model.as_deref().unwrap_or(&state.adapter.config().image_model),
        request.prompt.as_deref().unwrap_or_default(),
        request.n.unwrap_or(1)
    );

    match state.adapter.generate_image(request).await {
        Ok(result) => {
            info!("[Images] Returning {} image(s)", result.data.len());
            Json(result).into_response()
        },
        Err(e) => {
            warn!("[Images] Request failed: {}", e);
            error_response(&e)
        },
    }
}
