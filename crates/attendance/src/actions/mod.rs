//! Conversation actions module
//!
//! Provides high-level action handlers for staff mutations: changing a
//! conversation's triage status and recording a reason for absence.

mod handler;

pub use handler::ActionHandler;
