//! Action handler for conversation mutations
//!
//! Coordinates between the backend API and the sync engine for staff
//! actions.

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::backend::ConversationsApi;
use crate::models::{ConversationId, ConversationStatus};
use crate::sync::{RefetchReason, RefetchTrigger};

/// Handler for staff actions on a conversation
///
/// Actions are performed in two steps:
/// 1. Issue the targeted update against the backend
/// 2. Trigger the same full refetch a change notification would
///
/// The local list is never updated optimistically: on failure the error is
/// returned, no refetch happens, and the snapshot keeps its last synced
/// value.
pub struct ActionHandler {
    api: Arc<dyn ConversationsApi>,
    sync: RefetchTrigger,
}

impl ActionHandler {
    /// Create a new action handler
    pub fn new(api: Arc<dyn ConversationsApi>, sync: RefetchTrigger) -> Self {
        Self { api, sync }
    }

    /// Change the triage status of one conversation
    pub fn set_status(&self, id: &ConversationId, status: ConversationStatus) -> Result<()> {
        self.api.update_status(id, status)?;

        info!(
            "Updated status of conversation {} to {}",
            id.as_str(),
            status.as_str()
        );
        self.sync.refetch(RefetchReason::Mutation);
        Ok(())
    }

    /// Record the reason for absence on one conversation
    ///
    /// Any string is accepted; the suggested-reason catalogue is a display
    /// aid, not a validation gate.
    pub fn set_reason_for_absence(&self, id: &ConversationId, rfa: &str) -> Result<()> {
        self.api.update_rfa(id, rfa)?;

        info!("Updated reason for absence on conversation {}", id.as_str());
        self.sync.refetch(RefetchReason::Mutation);
        Ok(())
    }
}
