//! Vendor account credential.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A vendor account identifier pair used to authenticate outbound calls.
///
/// Built once from configuration and shared read-only for the process lifetime.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    /// Value sent as `x_token` and inside the storage `Firebase` authorization.
    pub token: String,
    /// Value sent as `x_user_id`.
    pub user_id: String,
}

impl Credential {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self { token: token.into(), user_id: user_id.into() }
    }

    /// Parse the `token|userId` form used by `NOVAAPP_CREDENTIAL_<n>` variables.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('|');
        let token = parts.next()?.trim();
        let user_id = parts.next()?.trim();
        if parts.next().is_some() || token.is_empty() || user_id.is_empty() {
            return None;
        }
        Some(Self::new(token, user_id))
    }
}

// Tokens must never reach the logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}
