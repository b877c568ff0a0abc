//! OpenAI-compatible request and response records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CHUNK_OBJECT: &str = "chat.completion.chunk";
pub const COMPLETION_OBJECT: &str = "chat.completion";

// ============================================================================
// Chat
// ============================================================================

/// OpenAI chat message. `content` is forwarded upstream untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Value,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self { role: role.into(), content: Value::String(content.into()) }
    }

    /// Plain text of the message, joining `text` parts of multimodal content.
    pub fn text(&self) -> Option<String> {
        match &self.content {
            Value::String(s) => Some(s.clone()),
            Value::Array(parts) => {
                let text: Vec<&str> = parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                    .collect();
                if text.is_empty() {
                    None
                } else {
                    Some(text.join("\n"))
                }
            },
            _ => None,
        }
    }
}

/// Inbound `/v1/chat/completions` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChatCompletionRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Accepted from clients and dropped before the upstream call.
    #[serde(default, skip_serializing)]
    pub stream_options: Option<Value>,
}

impl ChatCompletionRequest {
    /// Text of the most recent `user` message.
    pub fn last_user_text(&self) -> Option<String> {
        self.messages.iter().rev().find(|m| m.role == "user").and_then(ChatMessage::text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChunkDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    pub finish_reason: Option<String>,
}

/// One `chat.completion.chunk` SSE payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

impl ChatCompletionChunk {
    pub fn new(
        id: &str,
        created: i64,
        model: &str,
        content: Option<String>,
        finish_reason: Option<&str>,
    ) -> Self {
        Self {
            id: id.to_string(),
            object: CHUNK_OBJECT.to_string(),
            created,
            model: model.to_string(),
            choices: vec![ChunkChoice {
                index: 0,
                delta: ChunkDelta { content },
                finish_reason: finish_reason.map(str::to_string),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: AssistantMessage,
    pub finish_reason: String,
}

/// OpenAI usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Non-streaming `chat.completion` object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    pub usage: Usage,
}

// ============================================================================
// Images
// ============================================================================

/// Inbound `/v1/images/generations` body. Unused OpenAI fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ImageGenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub n: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageData {
    pub b64_json: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageGenerationResponse {
    pub created: i64,
    pub data: Vec<ImageData>,
}

// ============================================================================
// Models
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelCard {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelCard>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stream_options_is_dropped_on_serialize() {
        let req: ChatCompletionRequest = serde_json::from_value(json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "hi"}],
            "stream": true,
            "stream_options": {"include_usage": true}
        }))
        .expect("valid request");
        assert!(req.stream_options.is_some());

        let out = serde_json::to_value(&req).expect("serializable");
        assert!(out.get("stream_options").is_none());
    }

    #[test]
    fn test_last_user_text_picks_latest_user() {
        let req = ChatCompletionRequest {
            messages: vec![
                ChatMessage::new("user", "first"),
                ChatMessage::new("assistant", "reply"),
                ChatMessage::new("user", "second"),
                ChatMessage::new("assistant", "again"),
            ],
            ..Default::default()
        };
        assert_eq!(req.last_user_text().as_deref(), Some("second"));
    }

    #[test]
    fn test_message_text_joins_parts() {
        let msg = ChatMessage {
            role: "user".to_string(),
            content: json!([
                {"type": "text", "text": "a cat"},
                {"type": "image_url", "image_url": {"url": "http://x"}},
                {"type": "text", "text": "on a mat"}
            ]),
        };
        assert_eq!(msg.text().as_deref(), Some("a cat\non a mat"));
    }

    #[test]
    fn test_chunk_shape() {
        let chunk = ChatCompletionChunk::new("chatcmpl-1", 7, "gpt-4o", Some("Hi".into()), None);
        let v = serde_json::to_value(&chunk).expect("serializable");
        assert_eq!(v["object"], "chat.completion.chunk");
        assert_eq!(v["choices"][0]["index"], 0);
        assert_eq!(v["choices"][0]["delta"]["content"], "Hi");
        assert!(v["choices"][0]["finish_reason"].is_null());
    }
}
