//! Query API for UI consumption
//!
//! Pure projections over the synced conversation list: status filtering for
//! the table and per-status counts for the filter tab badges.

mod conversations;

pub use conversations::{StatusCounts, filter_by_status, status_counts};
