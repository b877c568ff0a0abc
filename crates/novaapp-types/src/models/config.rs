//! Adapter configuration models.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use super::Credential;
use crate::error::ConfigError;

// ============================================================================
// Upstream endpoints
// ============================================================================

/// Fixed vendor URLs plus the origin/referer pair its bot mitigation expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct UpstreamEndpoints {
    #[validate(url)]
    pub chat_url: String,
    #[validate(url)]
    pub image_submit_url: String,
    #[validate(url)]
    pub image_poll_url: String,
    /// Storage prefix the escaped relative asset path is appended to.
    #[validate(url)]
    pub storage_base_url: String,
    pub origin: String,
    pub referer: String,
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            chat_url: "https://api.novaapp.ai/api/chat".to_string(),
            image_submit_url: "https://api.novaapp.ai/api/chat/image".to_string(),
            image_poll_url: "https://api.novaapp.ai/api/image-generator".to_string(),
            storage_base_url:
                "https://firebasestorage.googleapis.com/v0/b/chat-ai-prod.appspot.com/o/"
                    .to_string(),
            origin: "https://chat.novaapp.ai".to_string(),
            referer: "https://chat.novaapp.ai/".to_string(),
        }
    }
}

// ============================================================================
// Adapter configuration
// ============================================================================

/// Everything the adapter needs, passed explicitly into its constructor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct AdapterConfig {
    /// Vendor accounts rotated round-robin.
    #[validate(length(min = 1, message = "at least one credential is required"))]
    pub credentials: Vec<Credential>,

    /// Public model name to vendor numeric id, in listing order.
    pub model_mapping: IndexMap<String, u32>,

    /// Model used when a chat request names none or an unknown one.
    #[validate(length(min = 1))]
    pub default_model: String,

    /// Model name that routes chat requests to image generation.
    #[validate(length(min = 1))]
    pub image_model: String,

    /// Inbound bearer key. `None`, empty or `"1"` disables auth.
    pub api_master_key: Option<String>,

    /// Transport timeout for every outbound request.
    pub request_timeout_secs: u64,

    /// Sleep between poll attempts of one image task.
    #[validate(range(min = 1))]
    pub polling_interval_secs: u64,

    /// Per-task polling deadline.
    pub polling_timeout_secs: u64,

    #[validate(nested)]
    pub endpoints: UpstreamEndpoints,
}

fn default_model_mapping() -> IndexMap<String, u32> {
    [
        ("gpt-4o-mini", 0),
        ("gpt-4o", 11),
        ("gpt-5", 2),
        ("gemini-flash", 10),
        ("claude-3.5-sonnet", 15),
        ("web-search", 14),
        ("nova-dalle3", 4),
    ]
    .into_iter()
    .map(|(name, id)| (name.to_string(), id))
    .collect()
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            credentials: Vec::new(),
            model_mapping: default_model_mapping(),
            default_model: "gpt-4o-mini".to_string(),
            image_model: "nova-dalle3".to_string(),
            api_master_key: None,
            request_timeout_secs: 300,
            polling_interval_secs: 2,
            polling_timeout_secs: 240,
            endpoints: UpstreamEndpoints::default(),
        }
    }
}

impl AdapterConfig {
    /// Run the derive checks plus the cross-field ones, reporting the first failure.
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        if self.credentials.is_empty() {
            return Err(ConfigError::invalid("credentials", "at least one credential is required"));
        }

        if let Err(errors) = self.validate() {
            let field_errors = errors.field_errors();
            let mut fields: Vec<_> = field_errors.iter().collect();
            fields.sort_by(|(a, _), (b, _)| a.cmp(b));
            let (field, message) = fields
                .first()
                .map(|(field, errs)| {
                    let message = errs
                        .first()
                        .map(|e| e.message.as_ref().unwrap_or(&e.code).to_string())
                        .unwrap_or_default();
                    (field.to_string(), message)
                })
                .unwrap_or_else(|| ("endpoints".to_string(), errors.to_string()));
            return Err(ConfigError::ValidationError { field, message });
        }

        if !self.model_mapping.contains_key(&self.default_model) {
            return Err(ConfigError::invalid(
                "default_model",
                format!("'{}' is not in model_mapping", self.default_model),
            ));
        }

        Ok(())
    }

    /// Numeric id for `name`, falling back to the default model's id.
    pub fn resolve_model_id(&self, name: &str) -> u32 {
        self.model_mapping
            .get(name)
            .or_else(|| self.model_mapping.get(&self.default_model))
            .copied()
            .unwrap_or_default()
    }

    /// Exact lookup without fallback.
    pub fn model_id(&self, name: &str) -> Option<u32> {
        self.model_mapping.get(name).copied()
    }

    /// Returns the master key when inbound auth is active.
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_master_key.as_deref().filter(|k| !k.is_empty() && *k != "1")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_secs)
    }

    pub fn polling_timeout(&self) -> Duration {
        Duration::from_secs(self.polling_timeout_secs)
    }
}
