//! Conversation model: one guardian-school messaging thread per absence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Guardian, GuardianId, Message};

/// Unique identifier for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ConversationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Triage state of a conversation
///
/// This is the closed enumeration the backend persists; filtering and
/// updates only ever use these four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    InProgress,
    ActionNeeded,
    Completed,
    AwaitingMessageApproval,
}

impl ConversationStatus {
    /// All statuses in the order the filter tabs present them
    pub const ALL: [ConversationStatus; 4] = [
        ConversationStatus::ActionNeeded,
        ConversationStatus::AwaitingMessageApproval,
        ConversationStatus::InProgress,
        ConversationStatus::Completed,
    ];

    /// The persisted wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::InProgress => "in_progress",
            ConversationStatus::ActionNeeded => "action_needed",
            ConversationStatus::Completed => "completed",
            ConversationStatus::AwaitingMessageApproval => "awaiting_message_approval",
        }
    }

    /// Human-readable label for tabs and the status dropdown
    pub fn label(&self) -> &'static str {
        match self {
            ConversationStatus::InProgress => "In Progress",
            ConversationStatus::ActionNeeded => "Action Needed",
            ConversationStatus::Completed => "Completed",
            ConversationStatus::AwaitingMessageApproval => "Awaiting Approval",
        }
    }
}

/// Next step the backend's triage suggested for a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    MarkAsCompleted,
    AttendanceOfficerTakeOver,
}

/// A conversation as the dashboard displays it
///
/// Derived read-only projection of a raw backend row: scalars copied
/// through, timestamps parsed, and the newest message pulled out of the
/// embedded collection. Rebuilt wholesale on every sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    /// What the conversation is about (e.g. an absence date)
    pub topic: String,
    pub student_id: String,
    pub school_id: String,
    pub status: ConversationStatus,
    /// Reason for absence, once one has been recorded
    pub rfa: Option<String>,
    pub absence_id: Option<String>,
    pub recommended_action: Option<RecommendedAction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Staff member the conversation is assigned to, if any
    pub user_id: Option<String>,
    pub guardian_id: GuardianId,
    pub guardian: Guardian,
    /// The message with the greatest creation timestamp, if any exist
    pub latest_message: Option<Message>,
}

/// Which conversations the table shows
///
/// Single-valued: one active filter at a time, `All` by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ConversationStatus),
}

impl StatusFilter {
    /// Whether a conversation with the given status passes this filter
    pub fn matches(&self, status: ConversationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// Every selectable filter, in tab order ("All" first)
    pub fn all_options() -> [StatusFilter; 5] {
        [
            StatusFilter::All,
            StatusFilter::Only(ConversationStatus::ActionNeeded),
            StatusFilter::Only(ConversationStatus::AwaitingMessageApproval),
            StatusFilter::Only(ConversationStatus::InProgress),
            StatusFilter::Only(ConversationStatus::Completed),
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.label(),
        }
    }
}
