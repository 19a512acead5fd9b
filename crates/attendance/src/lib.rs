//! Attendance crate - Data layer for the school-attendance messaging dashboard
//!
//! This crate provides platform-independent dashboard functionality including:
//! - Domain models (Conversation, Message, Guardian, status and RFA types)
//! - Backend REST client and change-notification feed
//! - Normalization of raw joined rows into display records
//! - Live sync engine with full-refetch-on-change semantics
//! - Filter/query API for table rendering
//! - Action handlers for staff mutations (status, reason for absence)
//! - Attendance report upload to the outreach service
//!
//! This crate has zero UI dependencies; the dashboard front end consumes it
//! through the sync handle and query functions.

pub mod actions;
pub mod backend;
pub mod config;
pub mod ingest;
pub mod models;
pub mod query;
pub mod sync;

pub use actions::ActionHandler;
pub use backend::{
    BackendClient, ChangeCallback, ChangeEvent, ChangeFeed, ConversationsApi, InMemoryBackend,
    InMemoryFeed, StreamingFeed, Subscription, WatchedTable, normalize_conversation,
    normalize_conversations,
};
pub use crate::config::BackendCredentials;
pub use ingest::{
    UploadError, UploadReceipt, upload_attendance_report, upload_attendance_report_path,
};
pub use models::{
    Conversation, ConversationId, ConversationStatus, Guardian, GuardianId, Message, MessageId,
    RecommendedAction, SenderKind, StatusFilter,
};
pub use query::{StatusCounts, filter_by_status, status_counts};
pub use sync::{RefetchReason, RefetchTrigger, SyncEvent, SyncHandle, start_sync};
