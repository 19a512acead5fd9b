//! Integration tests for the attendance crate
//!
//! These tests verify the complete flow from sync start through
//! change-driven refetches, staff mutations, and teardown, using the
//! in-memory backend and feed.

use std::sync::Arc;
use std::time::Duration;

use attendance::backend::api::{ConversationRow, GuardianRow, MessageRow};
use attendance::{
    ActionHandler, ConversationId, ConversationStatus, InMemoryBackend, InMemoryFeed,
    RefetchReason, SenderKind, StatusFilter, SyncEvent, SyncHandle, WatchedTable,
    filter_by_status, start_sync,
};

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper to create test message rows
fn make_message(content: &str, created_at: &str) -> MessageRow {
    MessageRow {
        content: content.to_string(),
        created_at: created_at.to_string(),
        sender_type: SenderKind::Guardian,
        id: None,
        status: None,
        was_downgraded: None,
    }
}

/// Helper to create test conversation rows
fn make_row(
    id: &str,
    status: ConversationStatus,
    updated_at: &str,
    messages: Vec<MessageRow>,
) -> ConversationRow {
    ConversationRow {
        id: id.to_string(),
        school_id: "school-1".to_string(),
        guardian_id: "guardian-1".to_string(),
        student_id: "student-1".to_string(),
        absence_id: Some(format!("absence-{}", id)),
        user_id: None,
        topic: "Absence on 2024-03-04".to_string(),
        status,
        rfa: None,
        recommended_action: None,
        created_at: "2024-03-04T08:00:00+00:00".to_string(),
        updated_at: updated_at.to_string(),
        guardian: GuardianRow {
            id: "guardian-1".to_string(),
            school_id: "school-1".to_string(),
            first_name: Some("Jamie".to_string()),
            last_name: Some("Rivera".to_string()),
            email: None,
            phone_number: "+15551234567".to_string(),
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        },
        messages,
    }
}

fn wait_for_event(handle: &SyncHandle) -> SyncEvent {
    handle
        .events()
        .recv_timeout(EVENT_TIMEOUT)
        .expect("timed out waiting for sync event")
}

#[test]
fn test_initial_sync_populates_snapshot() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.insert(make_row(
        "c1",
        ConversationStatus::InProgress,
        "2024-03-04T09:00:00+00:00",
        vec![
            make_message("We noticed an absence today", "2024-03-04T08:00:00+00:00"),
            make_message("She has a fever", "2024-03-04T08:30:00+00:00"),
        ],
    ));
    backend.insert(make_row(
        "c2",
        ConversationStatus::ActionNeeded,
        "2024-03-04T10:00:00+00:00",
        vec![],
    ));

    let feed = InMemoryFeed::new();
    let handle = start_sync(backend.clone(), &feed).unwrap();

    let event = wait_for_event(&handle);
    assert_eq!(
        event,
        SyncEvent::Refreshed {
            conversations: 2,
            reason: RefetchReason::Initial,
        }
    );

    let conversations = handle.conversations();
    assert_eq!(conversations.len(), 2);
    // Ordered by updated_at descending, like the backend fetch
    assert_eq!(conversations[0].id.as_str(), "c2");
    assert_eq!(conversations[1].id.as_str(), "c1");

    // Latest message picked from the embedded collection
    let latest = conversations[1].latest_message.as_ref().unwrap();
    assert_eq!(latest.content, "She has a fever");
    assert!(conversations[0].latest_message.is_none());

    handle.stop();
}

#[test]
fn test_change_notification_triggers_refetch() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.insert(make_row(
        "c1",
        ConversationStatus::InProgress,
        "2024-03-04T09:00:00+00:00",
        vec![],
    ));

    let feed = InMemoryFeed::new();
    let handle = start_sync(backend.clone(), &feed).unwrap();
    wait_for_event(&handle);

    // A guardian reply lands: new message row, conversation bumped
    backend.insert(make_row(
        "c1",
        ConversationStatus::ActionNeeded,
        "2024-03-04T11:00:00+00:00",
        vec![make_message("Sorry, he overslept", "2024-03-04T10:59:00+00:00")],
    ));
    feed.emit(WatchedTable::Messages);

    let event = wait_for_event(&handle);
    assert_eq!(
        event,
        SyncEvent::Refreshed {
            conversations: 1,
            reason: RefetchReason::MessageChange,
        }
    );

    let conversations = handle.conversations();
    assert_eq!(conversations[0].status, ConversationStatus::ActionNeeded);
    assert_eq!(
        conversations[0].latest_message.as_ref().unwrap().content,
        "Sorry, he overslept"
    );

    handle.stop();
}

#[test]
fn test_set_status_roundtrip() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.insert(make_row(
        "x",
        ConversationStatus::InProgress,
        "2024-03-04T09:00:00+00:00",
        vec![],
    ));

    let feed = InMemoryFeed::new();
    let handle = start_sync(backend.clone(), &feed).unwrap();
    wait_for_event(&handle);

    let actions = ActionHandler::new(backend.clone(), handle.trigger());
    actions
        .set_status(&ConversationId::new("x"), ConversationStatus::Completed)
        .unwrap();

    let event = wait_for_event(&handle);
    assert_eq!(
        event,
        SyncEvent::Refreshed {
            conversations: 1,
            reason: RefetchReason::Mutation,
        }
    );

    let conversations = handle.conversations();
    assert_eq!(conversations[0].id.as_str(), "x");
    assert_eq!(conversations[0].status, ConversationStatus::Completed);

    handle.stop();
}

#[test]
fn test_set_rfa_roundtrip() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.insert(make_row(
        "c1",
        ConversationStatus::ActionNeeded,
        "2024-03-04T09:00:00+00:00",
        vec![],
    ));

    let feed = InMemoryFeed::new();
    let handle = start_sync(backend.clone(), &feed).unwrap();
    wait_for_event(&handle);

    let actions = ActionHandler::new(backend.clone(), handle.trigger());
    actions
        .set_reason_for_absence(&ConversationId::new("c1"), "Excused - Sick")
        .unwrap();

    wait_for_event(&handle);
    assert_eq!(
        handle.conversations()[0].rfa.as_deref(),
        Some("Excused - Sick")
    );

    handle.stop();
}

#[test]
fn test_failed_mutation_leaves_snapshot_unchanged() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.insert(make_row(
        "c1",
        ConversationStatus::InProgress,
        "2024-03-04T09:00:00+00:00",
        vec![],
    ));

    let feed = InMemoryFeed::new();
    let handle = start_sync(backend.clone(), &feed).unwrap();
    wait_for_event(&handle);
    let before = handle.conversations();

    backend.set_fail_updates(true);
    let actions = ActionHandler::new(backend.clone(), handle.trigger());
    let result = actions.set_status(&ConversationId::new("c1"), ConversationStatus::Completed);
    assert!(result.is_err());

    // No refetch was triggered and the list is untouched
    assert!(
        handle
            .events()
            .recv_timeout(Duration::from_millis(200))
            .is_err()
    );
    assert_eq!(handle.conversations(), before);

    handle.stop();
}

#[test]
fn test_fetch_failure_keeps_last_good_snapshot() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.insert(make_row(
        "c1",
        ConversationStatus::InProgress,
        "2024-03-04T09:00:00+00:00",
        vec![],
    ));

    let feed = InMemoryFeed::new();
    let handle = start_sync(backend.clone(), &feed).unwrap();
    wait_for_event(&handle);

    backend.set_fail_fetches(true);
    feed.emit(WatchedTable::Conversations);

    match wait_for_event(&handle) {
        SyncEvent::FetchFailed { reason, .. } => {
            assert_eq!(reason, RefetchReason::ConversationChange);
        }
        other => panic!("expected fetch failure, got {:?}", other),
    }

    // Snapshot still holds the last successful fetch
    assert_eq!(handle.conversations().len(), 1);

    handle.stop();
}

#[test]
fn test_stop_releases_subscriptions_and_halts_fetches() {
    let backend = Arc::new(InMemoryBackend::new());
    let feed = InMemoryFeed::new();

    let handle = start_sync(backend.clone(), &feed).unwrap();
    wait_for_event(&handle);
    assert_eq!(feed.subscriber_count(), 2);

    handle.stop();
    assert_eq!(feed.subscriber_count(), 0);

    // Events after teardown reach nobody and trigger nothing
    let fetches_before = backend.fetch_count();
    feed.emit(WatchedTable::Conversations);
    feed.emit(WatchedTable::Messages);
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(backend.fetch_count(), fetches_before);
}

#[test]
fn test_filter_over_synced_snapshot() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.insert(make_row(
        "c1",
        ConversationStatus::InProgress,
        "2024-03-04T09:00:00+00:00",
        vec![],
    ));
    backend.insert(make_row(
        "c2",
        ConversationStatus::ActionNeeded,
        "2024-03-04T10:00:00+00:00",
        vec![],
    ));
    backend.insert(make_row(
        "c3",
        ConversationStatus::ActionNeeded,
        "2024-03-04T08:00:00+00:00",
        vec![],
    ));

    let feed = InMemoryFeed::new();
    let handle = start_sync(backend.clone(), &feed).unwrap();
    wait_for_event(&handle);

    let conversations = handle.conversations();
    let all = filter_by_status(&conversations, StatusFilter::All);
    assert_eq!(all, conversations);

    let action_needed = filter_by_status(
        &conversations,
        StatusFilter::Only(ConversationStatus::ActionNeeded),
    );
    let ids: Vec<&str> = action_needed.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c2", "c3"]);

    handle.stop();
}
