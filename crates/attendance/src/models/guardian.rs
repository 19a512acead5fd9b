//! Guardian model
//!
//! Guardians are owned by the backend; this subsystem only reads them as
//! part of the conversation join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a guardian
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuardianId(pub String);

impl GuardianId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GuardianId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GuardianId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A student's guardian, reachable by phone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guardian {
    pub id: GuardianId,
    /// School the guardian's student attends
    pub school_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Phone number conversations are conducted over; always present
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

impl Guardian {
    /// Format the guardian's name for display
    ///
    /// Joins the name parts that are present; falls back to the phone
    /// number when neither name is on file.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.phone_number.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_guardian(first: Option<&str>, last: Option<&str>) -> Guardian {
        Guardian {
            id: GuardianId::new("g1"),
            school_id: "s1".to_string(),
            first_name: first.map(|s| s.to_string()),
            last_name: last.map(|s| s.to_string()),
            email: None,
            phone_number: "+15551234567".to_string(),
            created_at: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_display_name_full() {
        let guardian = make_guardian(Some("Jamie"), Some("Rivera"));
        assert_eq!(guardian.display_name(), "Jamie Rivera");
    }

    #[test]
    fn test_display_name_partial() {
        assert_eq!(make_guardian(Some("Jamie"), None).display_name(), "Jamie");
        assert_eq!(make_guardian(None, Some("Rivera")).display_name(), "Rivera");
    }

    #[test]
    fn test_display_name_falls_back_to_phone() {
        let guardian = make_guardian(None, None);
        assert_eq!(guardian.display_name(), "+15551234567");
    }
}
