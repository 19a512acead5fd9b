//! Domain models for attendance conversations

mod conversation;
mod guardian;
mod message;
pub mod rfa;

pub use conversation::{
    Conversation, ConversationId, ConversationStatus, RecommendedAction, StatusFilter,
};
pub use guardian::{Guardian, GuardianId};
pub use message::{Message, MessageId, SenderKind};
