//! Message model for a single guardian/admin text within a conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderKind {
    /// The student's guardian, replying over SMS
    Guardian,
    /// School staff or the automated outreach service
    Admin,
}

impl SenderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderKind::Guardian => "guardian",
            SenderKind::Admin => "admin",
        }
    }

    /// Display label for the sender badge
    pub fn label(&self) -> &'static str {
        match self {
            SenderKind::Guardian => "Guardian",
            SenderKind::Admin => "Admin",
        }
    }
}

/// A single message within a conversation
///
/// The conversation fetch joins only a subset of message columns, so the
/// id and delivery status may be absent on records coming from that path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message id, when the backend included it
    pub id: Option<MessageId>,
    /// Message text as sent or received
    pub content: String,
    /// Who authored the message
    pub sender: SenderKind,
    /// When the message was created
    pub sent_at: DateTime<Utc>,
    /// Provider delivery status, when the backend included it
    pub delivery_status: Option<String>,
    /// Whether a rich message was downgraded to plain text in transit
    pub was_downgraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_kind_wire_names() {
        assert_eq!(serde_json::to_string(&SenderKind::Guardian).unwrap(), "\"guardian\"");
        assert_eq!(serde_json::to_string(&SenderKind::Admin).unwrap(), "\"admin\"");

        let parsed: SenderKind = serde_json::from_str("\"guardian\"").unwrap();
        assert_eq!(parsed, SenderKind::Guardian);
    }

    #[test]
    fn test_sender_kind_rejects_unknown() {
        assert!(serde_json::from_str::<SenderKind>("\"student\"").is_err());
    }

    #[test]
    fn test_sender_kind_labels() {
        assert_eq!(SenderKind::Guardian.label(), "Guardian");
        assert_eq!(SenderKind::Admin.label(), "Admin");
    }
}
