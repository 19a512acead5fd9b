//! In-memory backend implementations
//!
//! Used for testing and as stubs where the real HTTP backend is not
//! available. `InMemoryBackend` holds raw rows behind an RwLock;
//! `InMemoryFeed` delivers change events synchronously to subscribers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::{Result, bail};

use super::api::ConversationRow;
use super::traits::{
    ChangeCallback, ChangeEvent, ChangeFeed, ConversationsApi, Subscription, WatchedTable,
};
use crate::models::{ConversationId, ConversationStatus};

/// In-memory implementation of the conversations backend
pub struct InMemoryBackend {
    rows: RwLock<Vec<ConversationRow>>,
    fail_fetches: AtomicBool,
    fail_updates: AtomicBool,
    fetches: AtomicU64,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            fail_fetches: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            fetches: AtomicU64::new(0),
        }
    }

    /// Insert or replace a raw conversation row
    pub fn insert(&self, row: ConversationRow) {
        let mut rows = self.rows.write().unwrap();
        rows.retain(|existing| existing.id != row.id);
        rows.push(row);
    }

    /// Get a raw row by id
    pub fn get(&self, id: &str) -> Option<ConversationRow> {
        let rows = self.rows.read().unwrap();
        rows.iter().find(|row| row.id == id).cloned()
    }

    /// Make subsequent fetches fail (simulated backend error)
    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent updates fail (simulated backend error)
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// How many fetches have been attempted
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationsApi for InMemoryBackend {
    fn fetch_conversations(&self) -> Result<Vec<ConversationRow>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            bail!("Simulated fetch failure");
        }

        let rows = self.rows.read().unwrap();
        let mut result = rows.clone();
        // Match the backend's ordering contract
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(result)
    }

    fn update_status(&self, id: &ConversationId, status: ConversationStatus) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            bail!("Simulated update failure");
        }

        let mut rows = self.rows.write().unwrap();
        match rows.iter_mut().find(|row| row.id == id.as_str()) {
            Some(row) => {
                row.status = status;
                Ok(())
            }
            None => bail!("No conversation with id {}", id.as_str()),
        }
    }

    fn update_rfa(&self, id: &ConversationId, rfa: &str) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            bail!("Simulated update failure");
        }

        let mut rows = self.rows.write().unwrap();
        match rows.iter_mut().find(|row| row.id == id.as_str()) {
            Some(row) => {
                row.rfa = Some(rfa.to_string());
                Ok(())
            }
            None => bail!("No conversation with id {}", id.as_str()),
        }
    }
}

struct Subscriber {
    id: u64,
    table: WatchedTable,
    callback: ChangeCallback,
}

struct FeedInner {
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
}

/// In-memory change feed delivering events synchronously
#[derive(Clone)]
pub struct InMemoryFeed {
    inner: Arc<FeedInner>,
}

impl InMemoryFeed {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(FeedInner {
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Deliver a change event to every subscriber of the given table
    pub fn emit(&self, table: WatchedTable) {
        let subscribers = self.inner.subscribers.read().unwrap();
        for subscriber in subscribers.iter().filter(|s| s.table == table) {
            (subscriber.callback)(ChangeEvent { table });
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().unwrap().len()
    }
}

impl Default for InMemoryFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed for InMemoryFeed {
    fn subscribe(&self, table: WatchedTable, on_change: ChangeCallback) -> Result<Subscription> {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.subscribers.write().unwrap().push(Subscriber {
            id,
            table,
            callback: on_change,
        });

        let inner = Arc::clone(&self.inner);
        Ok(Subscription::new(move || {
            inner.subscribers.write().unwrap().retain(|s| s.id != id);
        }))
    }
}
