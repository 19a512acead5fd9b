//! Live sync engine for the conversation list
//!
//! Keeps an in-memory snapshot of display conversations consistent with the
//! backend: any change notification or mutation triggers a full refetch and
//! wholesale snapshot replacement, never an incremental patch.

mod engine;

pub use engine::{RefetchReason, RefetchTrigger, SyncEvent, SyncHandle, start_sync};
