//! HTTP client for the hosted conversations backend
//!
//! Speaks the backend's REST dialect: embedded-resource selects for the
//! joined fetch, `id=eq.<uuid>` filters for targeted updates.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::error;

use super::api::ConversationRow;
use super::traits::ConversationsApi;
use crate::config::BackendCredentials;
use crate::models::{ConversationId, ConversationStatus};

/// How much of a malformed payload to keep in the diagnostic log
const PAYLOAD_LOG_LIMIT: usize = 2048;

/// Client for the conversations REST surface
pub struct BackendClient {
    base_url: String,
    anon_key: String,
}

impl BackendClient {
    /// REST path prefix on the hosted backend
    const REST_PATH: &'static str = "/rest/v1";

    /// Embedded-resource select: every conversation column, the guardian
    /// joined by foreign key, and the message columns the table renders
    const CONVERSATIONS_SELECT: &'static str =
        "*,guardian:guardians(*),messages:messages(content,created_at,sender_type)";

    /// Create a new client for the given backend
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            anon_key: anon_key.into(),
        }
    }

    /// Create a client from loaded credentials
    pub fn from_credentials(credentials: &BackendCredentials) -> Self {
        Self::new(&credentials.url, &credentials.anon_key)
    }

    fn conversations_url(&self) -> String {
        format!(
            "{}{}/conversations?select={}&order=updated_at.desc",
            self.base_url,
            Self::REST_PATH,
            urlencoding::encode(Self::CONVERSATIONS_SELECT)
        )
    }

    fn update_url(&self, id: &ConversationId) -> String {
        format!(
            "{}{}/conversations?id=eq.{}",
            self.base_url,
            Self::REST_PATH,
            urlencoding::encode(id.as_str())
        )
    }

    /// Update a single named field on the row matching the given id
    fn update_field(&self, id: &ConversationId, field: &str, value: serde_json::Value) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), value);

        ureq::patch(&self.update_url(id))
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", self.anon_key))
            .header("Prefer", "return=minimal")
            .send_json(serde_json::Value::Object(body))
            .with_context(|| format!("Failed to update conversation {}", id.as_str()))?;

        Ok(())
    }
}

impl ConversationsApi for BackendClient {
    fn fetch_conversations(&self) -> Result<Vec<ConversationRow>> {
        let mut response = ureq::get(&self.conversations_url())
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", self.anon_key))
            .call()
            .context("Failed to send fetch conversations request")?;

        let body = response
            .body_mut()
            .read_to_string()
            .context("Failed to read conversations response")?;

        // Decode through the typed rows; a row missing a required field
        // fails the whole fetch rather than being partially applied.
        match serde_json::from_str::<Vec<ConversationRow>>(&body) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                error!(
                    "Unexpected conversations payload: {}",
                    truncate_for_log(&body, PAYLOAD_LOG_LIMIT)
                );
                Err(anyhow::Error::new(e).context("Failed to parse conversations response"))
            }
        }
    }

    fn update_status(&self, id: &ConversationId, status: ConversationStatus) -> Result<()> {
        self.update_field(
            id,
            "status",
            serde_json::Value::String(status.as_str().to_string()),
        )
    }

    fn update_rfa(&self, id: &ConversationId, rfa: &str) -> Result<()> {
        self.update_field(id, "rfa", serde_json::Value::String(rfa.to_string()))
    }
}

/// Truncate a payload for logging without splitting a UTF-8 character
fn truncate_for_log(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
