//! Hosted backend integration
//!
//! This module provides:
//! - Typed wire rows for the conversation fetch (`api`)
//! - Trait seams for the query surface and change notifications
//! - An HTTP client speaking the backend's REST dialect
//! - A streaming change-notification feed
//! - Row normalization into display models

mod client;
mod feed;
mod memory;
mod normalize;
mod traits;

pub use client::BackendClient;
pub use feed::StreamingFeed;
pub use memory::{InMemoryBackend, InMemoryFeed};
pub use normalize::{normalize_conversation, normalize_conversations};
pub use traits::{
    ChangeCallback, ChangeEvent, ChangeFeed, ConversationsApi, Subscription, WatchedTable,
};

/// Backend wire row types
pub mod api {
    use serde::Deserialize;

    use crate::models::{ConversationStatus, RecommendedAction, SenderKind};

    /// A conversation row as returned by the joined fetch
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct ConversationRow {
        pub id: String,
        pub school_id: String,
        pub guardian_id: String,
        pub student_id: String,
        pub absence_id: Option<String>,
        pub user_id: Option<String>,
        pub topic: String,
        pub status: ConversationStatus,
        pub rfa: Option<String>,
        #[serde(default)]
        pub recommended_action: Option<RecommendedAction>,
        pub created_at: String,
        pub updated_at: String,
        /// Guardian joined by foreign key
        pub guardian: GuardianRow,
        /// Embedded message collection; unordered on the wire
        #[serde(default)]
        pub messages: Vec<MessageRow>,
    }

    /// A guardian row embedded in the conversation fetch
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct GuardianRow {
        pub id: String,
        pub school_id: String,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        #[serde(default)]
        pub email: Option<String>,
        pub phone_number: String,
        pub created_at: String,
    }

    /// A message row embedded in the conversation fetch
    ///
    /// The fetch join selects only content, created_at, and sender_type;
    /// the remaining columns decode when present and default otherwise.
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct MessageRow {
        pub content: String,
        pub created_at: String,
        pub sender_type: SenderKind,
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub status: Option<String>,
        #[serde(default)]
        pub was_downgraded: Option<bool>,
    }
}
