// OpenAI -> vendor request mapping

use serde_json::{json, Value};

use novaapp_types::protocol::openai::ChatCompletionRequest;
use novaapp_types::AdapterConfig;

/// Model name the caller asked for, or the configured default.
pub fn requested_model(request: &ChatCompletionRequest, config: &AdapterConfig) -> String {
    request
        .model
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(&config.default_model)
        .to_string()
}

/// Build `{messages, model: <numeric id>}`; `stream_options` never reaches upstream.
pub fn build_chat_payload(request: &ChatCompletionRequest, config: &AdapterConfig) -> (Value, u32) {
    let model_name = requested_model(request, config);
    let model_id = config.resolve_model_id(&model_name);
    let payload = json!({
        "messages": request.messages,
        "model": model_id,
    });
    (payload, model_id)
}
