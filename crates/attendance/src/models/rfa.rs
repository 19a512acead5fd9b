//! Reason-for-absence catalogue
//!
//! Any string is accepted for persistence; the suggested list below only
//! drives the dropdown contents and the excused/unexcused display grouping.

/// Suggested reasons offered in the RFA dropdown
pub const SUGGESTED_REASONS: [&str; 25] = [
    "Excused - Sick",
    "Excused - Appointment",
    "Excused - Travel",
    "Excused - Family emergency",
    "Excused - Bereavement",
    "Excused - Religious observance",
    "Excused - School-approved activity",
    "Excused - Weather or natural disaster",
    "Excused - Mental health day",
    "Excused - Therapy or counseling appointment",
    "Excused - College visit",
    "Excused - Military duty (for family member)",
    "Excused - Cultural observance",
    "Excused - Other",
    "Unexcused - Sick (non-approved)",
    "Unexcused - Travel (non-approved)",
    "Unexcused - Overslept",
    "Unexcused - Transportation issues",
    "Unexcused - Skipping class",
    "Unexcused - Family vacation (non-approved)",
    "Unexcused - Work",
    "Unexcused - Forgot to attend online class",
    "Unexcused - Technology issues",
    "Unexcused - Misunderstanding of schedule",
    "Unexcused - Other",
];

/// Display grouping for a recorded reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfaCategory {
    Excused,
    Unexcused,
}

/// Categorize a stored reason by its prefix
///
/// Returns `None` for free-form reasons outside the two groups; the table
/// renders those without a category highlight.
pub fn categorize(rfa: &str) -> Option<RfaCategory> {
    if rfa.starts_with("Excused") {
        Some(RfaCategory::Excused)
    } else if rfa.starts_with("Unexcused") {
        Some(RfaCategory::Unexcused)
    } else {
        None
    }
}

/// Whether a reason is one of the suggested dropdown entries
pub fn is_suggested(rfa: &str) -> bool {
    SUGGESTED_REASONS.contains(&rfa)
}
