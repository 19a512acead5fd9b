//! Conversation query functions

use crate::models::{Conversation, ConversationStatus, StatusFilter};

/// Filter the conversation list by the active status filter
///
/// `StatusFilter::All` returns the whole list; otherwise exactly the
/// subsequence whose status matches, preserving relative order.
pub fn filter_by_status(conversations: &[Conversation], filter: StatusFilter) -> Vec<Conversation> {
    conversations
        .iter()
        .filter(|conversation| filter.matches(conversation.status))
        .cloned()
        .collect()
}

/// Number of conversations in each status
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub action_needed: usize,
    pub awaiting_message_approval: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    /// Count for a single status
    pub fn get(&self, status: ConversationStatus) -> usize {
        match status {
            ConversationStatus::ActionNeeded => self.action_needed,
            ConversationStatus::AwaitingMessageApproval => self.awaiting_message_approval,
            ConversationStatus::InProgress => self.in_progress,
            ConversationStatus::Completed => self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.action_needed + self.awaiting_message_approval + self.in_progress + self.completed
    }
}

/// Tally the conversation list by status (drives the filter tab badges)
pub fn status_counts(conversations: &[Conversation]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for conversation in conversations {
        match conversation.status {
            ConversationStatus::ActionNeeded => counts.action_needed += 1,
            ConversationStatus::AwaitingMessageApproval => counts.awaiting_message_approval += 1,
            ConversationStatus::InProgress => counts.in_progress += 1,
            ConversationStatus::Completed => counts.completed += 1,
        }
    }
    counts
}
