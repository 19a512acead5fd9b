//! Sync engine implementation
//!
//! One worker thread drains a signal queue; every signal causes a full
//! fetch-and-renormalize whose result replaces the snapshot. Overlapping
//! triggers therefore serialize: there is no race between an older and a
//! newer fetch result.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;

use anyhow::Result;
use log::{error, info};

use crate::backend::{
    ChangeFeed, ConversationsApi, Subscription, WatchedTable, normalize_conversations,
};
use crate::models::Conversation;

/// Why a refetch was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefetchReason {
    /// The initial fetch issued when sync starts
    Initial,
    /// A change notification on the conversation table
    ConversationChange,
    /// A change notification on the message table
    MessageChange,
    /// A successful status or rfa mutation
    Mutation,
    /// An explicit caller request
    Manual,
}

/// Notification emitted by the sync worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The snapshot was replaced with a fresh fetch
    Refreshed {
        conversations: usize,
        reason: RefetchReason,
    },
    /// A fetch failed; the snapshot keeps its last good value
    FetchFailed {
        reason: RefetchReason,
        message: String,
    },
}

enum Signal {
    Refetch(RefetchReason),
    Stop,
}

/// Cloneable handle for enqueueing refetches (used by mutation handlers)
#[derive(Clone)]
pub struct RefetchTrigger {
    tx: Sender<Signal>,
}

impl RefetchTrigger {
    /// Enqueue a refetch; a no-op after the sync has been stopped
    pub fn refetch(&self, reason: RefetchReason) {
        let _ = self.tx.send(Signal::Refetch(reason));
    }
}

/// Owned handle to a running sync
///
/// Holds the change subscriptions, the worker thread, and the conversation
/// snapshot. Stopping (or dropping) the handle releases the subscriptions
/// and joins the worker, so no fetch can run after teardown.
pub struct SyncHandle {
    signal_tx: Sender<Signal>,
    events: Receiver<SyncEvent>,
    snapshot: Arc<RwLock<Vec<Conversation>>>,
    subscriptions: Vec<Subscription>,
    worker: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Clone of the current conversation list
    pub fn conversations(&self) -> Vec<Conversation> {
        self.snapshot.read().unwrap().clone()
    }

    /// Enqueue an explicit refetch
    pub fn refetch(&self) {
        let _ = self.signal_tx.send(Signal::Refetch(RefetchReason::Manual));
    }

    /// A cloneable trigger for mutation handlers
    pub fn trigger(&self) -> RefetchTrigger {
        RefetchTrigger {
            tx: self.signal_tx.clone(),
        }
    }

    /// Receiver for sync notifications (refreshes and fetch failures)
    pub fn events(&self) -> &Receiver<SyncEvent> {
        &self.events
    }

    /// Stop syncing: unsubscribe both channels and join the worker
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the subscriptions first guarantees no signal arrives
        // after the queue drains.
        self.subscriptions.clear();
        let _ = self.signal_tx.send(Signal::Stop);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start syncing conversations from the backend
///
/// Subscribes to change notifications for the conversation and message
/// tables, enqueues the initial fetch, and spawns the sync worker. The
/// returned handle owns everything; see [`SyncHandle::stop`].
pub fn start_sync(api: Arc<dyn ConversationsApi>, feed: &dyn ChangeFeed) -> Result<SyncHandle> {
    let (signal_tx, signal_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();
    let snapshot = Arc::new(RwLock::new(Vec::new()));

    let conversation_tx = signal_tx.clone();
    let conversation_sub = feed.subscribe(
        WatchedTable::Conversations,
        Box::new(move |_| {
            let _ = conversation_tx.send(Signal::Refetch(RefetchReason::ConversationChange));
        }),
    )?;

    let message_tx = signal_tx.clone();
    let message_sub = feed.subscribe(
        WatchedTable::Messages,
        Box::new(move |_| {
            let _ = message_tx.send(Signal::Refetch(RefetchReason::MessageChange));
        }),
    )?;

    let _ = signal_tx.send(Signal::Refetch(RefetchReason::Initial));

    let worker_snapshot = Arc::clone(&snapshot);
    let worker = std::thread::Builder::new()
        .name("conversation-sync".to_string())
        .spawn(move || run_sync_loop(api, worker_snapshot, signal_rx, event_tx))?;

    info!("Conversation sync started");

    Ok(SyncHandle {
        signal_tx,
        events: event_rx,
        snapshot,
        subscriptions: vec![conversation_sub, message_sub],
        worker: Some(worker),
    })
}

fn run_sync_loop(
    api: Arc<dyn ConversationsApi>,
    snapshot: Arc<RwLock<Vec<Conversation>>>,
    signals: Receiver<Signal>,
    events: Sender<SyncEvent>,
) {
    while let Ok(signal) = signals.recv() {
        let mut reason = match signal {
            Signal::Stop => break,
            Signal::Refetch(reason) => reason,
        };

        // Collapse a burst of queued notifications into one fetch; every
        // refetch produces the same full snapshot anyway.
        loop {
            match signals.try_recv() {
                Ok(Signal::Stop) => return,
                Ok(Signal::Refetch(newer)) => reason = newer,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        match api.fetch_conversations() {
            Ok(rows) => {
                let conversations = normalize_conversations(rows);
                let count = conversations.len();
                *snapshot.write().unwrap() = conversations;
                let _ = events.send(SyncEvent::Refreshed {
                    conversations: count,
                    reason,
                });
            }
            Err(e) => {
                error!("Failed to refresh conversations: {:#}", e);
                let _ = events.send(SyncEvent::FetchFailed {
                    reason,
                    message: e.to_string(),
                });
            }
        }
    }

    info!("Conversation sync stopped");
}
