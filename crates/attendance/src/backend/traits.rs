//! Backend trait definitions
//!
//! These traits abstract over the hosted backend so the sync engine and
//! mutation handlers can run against the HTTP client or an in-memory
//! implementation.

use anyhow::Result;

use super::api::ConversationRow;
use crate::models::{ConversationId, ConversationStatus};

/// Query and mutation surface of the conversations backend
pub trait ConversationsApi: Send + Sync {
    /// Fetch all conversations joined with their guardian and messages,
    /// ordered by updated_at descending
    fn fetch_conversations(&self) -> Result<Vec<ConversationRow>>;

    /// Update the status field on exactly one conversation row
    fn update_status(&self, id: &ConversationId, status: ConversationStatus) -> Result<()>;

    /// Update the rfa field on exactly one conversation row
    fn update_rfa(&self, id: &ConversationId, rfa: &str) -> Result<()>;
}

/// Tables the dashboard watches for changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchedTable {
    Conversations,
    Messages,
}

impl WatchedTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchedTable::Conversations => "conversations",
            WatchedTable::Messages => "messages",
        }
    }
}

/// An opaque "something changed" notification
///
/// The event kind (insert, update, delete) is deliberately not carried;
/// every event triggers the same full refetch.
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent {
    pub table: WatchedTable,
}

/// Callback invoked for every change notification on a subscribed table
pub type ChangeCallback = Box<dyn Fn(ChangeEvent) + Send + Sync>;

/// Source of change notifications for watched tables
pub trait ChangeFeed {
    /// Subscribe to change notifications for one table
    ///
    /// The returned guard keeps the subscription alive; dropping it
    /// unsubscribes.
    fn subscribe(&self, table: WatchedTable, on_change: ChangeCallback) -> Result<Subscription>;
}

/// Owned subscription guard; unsubscribes on drop
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
