//! Backend row normalization
//!
//! Converts raw joined rows into the display models the dashboard renders.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::api::{ConversationRow, GuardianRow, MessageRow};
use crate::models::{Conversation, ConversationId, Guardian, GuardianId, Message, MessageId};

/// Normalize a fetched batch of raw conversation rows
///
/// Pure and order-preserving: the output has exactly one display record per
/// input row, in input order. Safe to call repeatedly on the same data.
pub fn normalize_conversations(rows: Vec<ConversationRow>) -> Vec<Conversation> {
    rows.into_iter().map(normalize_conversation).collect()
}

/// Normalize a single raw conversation row
///
/// Sorts the embedded messages by creation timestamp descending (stable, so
/// equal timestamps keep their wire order) and takes the first as the
/// latest message.
pub fn normalize_conversation(row: ConversationRow) -> Conversation {
    let mut messages: Vec<Message> = row.messages.into_iter().map(normalize_message).collect();
    messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
    let latest_message = messages.into_iter().next();

    Conversation {
        id: ConversationId::new(row.id),
        topic: row.topic,
        student_id: row.student_id,
        school_id: row.school_id,
        status: row.status,
        rfa: row.rfa,
        absence_id: row.absence_id,
        recommended_action: row.recommended_action,
        created_at: parse_timestamp(&row.created_at),
        updated_at: parse_timestamp(&row.updated_at),
        user_id: row.user_id,
        guardian_id: GuardianId::new(row.guardian_id),
        guardian: normalize_guardian(row.guardian),
        latest_message,
    }
}

fn normalize_message(row: MessageRow) -> Message {
    Message {
        id: row.id.map(MessageId::new),
        content: row.content,
        sender: row.sender_type,
        sent_at: parse_timestamp(&row.created_at),
        delivery_status: row.status,
        was_downgraded: row.was_downgraded.unwrap_or(false),
    }
}

fn normalize_guardian(row: GuardianRow) -> Guardian {
    Guardian {
        id: GuardianId::new(row.id),
        school_id: row.school_id,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        phone_number: row.phone_number,
        created_at: parse_timestamp(&row.created_at),
    }
}

/// Timestamp formats without an offset that the backend has been seen to emit
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a backend timestamp string
///
/// Tries RFC 3339 first, then offset-less variants. Falls back to the Unix
/// epoch so normalization stays total and deterministic; shape validation
/// already happened in the typed decode.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.and_utc();
        }
    }

    DateTime::<Utc>::UNIX_EPOCH
}
