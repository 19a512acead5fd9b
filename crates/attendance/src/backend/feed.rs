//! Streaming change-notification feed
//!
//! Reads a line-delimited change stream per watched table on a background
//! thread. Every non-empty line is an opaque "something changed" event; the
//! payload is never interpreted.

use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;

use super::traits::{ChangeCallback, ChangeEvent, ChangeFeed, Subscription, WatchedTable};

/// Delay before reopening a dropped change stream
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Change feed over the backend's streaming changes endpoint
pub struct StreamingFeed {
    base_url: String,
    anon_key: String,
}

impl StreamingFeed {
    /// Streaming changes path on the hosted backend
    const CHANGES_PATH: &'static str = "/realtime/v1/changes";

    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            anon_key: anon_key.into(),
        }
    }

    fn stream_url(&self, table: WatchedTable) -> String {
        format!(
            "{}{}?table={}",
            self.base_url,
            Self::CHANGES_PATH,
            table.as_str()
        )
    }
}

impl ChangeFeed for StreamingFeed {
    fn subscribe(&self, table: WatchedTable, on_change: ChangeCallback) -> Result<Subscription> {
        let url = self.stream_url(table);
        let anon_key = self.anon_key.clone();
        let cancelled = Arc::new(AtomicBool::new(false));
        let reader_cancelled = Arc::clone(&cancelled);

        std::thread::Builder::new()
            .name(format!("feed-{}", table.as_str()))
            .spawn(move || run_stream(&url, &anon_key, table, on_change, &reader_cancelled))
            .context("Failed to spawn change feed thread")?;

        Ok(Subscription::new(move || {
            cancelled.store(true, Ordering::SeqCst);
        }))
    }
}

/// Stream loop: reopen the connection until cancelled
///
/// A cancelled reader exits at the next event or stream close; the blocking
/// read cannot be interrupted mid-wait.
fn run_stream(
    url: &str,
    anon_key: &str,
    table: WatchedTable,
    on_change: ChangeCallback,
    cancelled: &AtomicBool,
) {
    while !cancelled.load(Ordering::SeqCst) {
        match open_stream(url, anon_key) {
            Ok(reader) => {
                for line in reader.lines() {
                    if cancelled.load(Ordering::SeqCst) {
                        return;
                    }
                    match line {
                        Ok(line) if line.trim().is_empty() => {} // keepalive
                        Ok(_) => on_change(ChangeEvent { table }),
                        Err(e) => {
                            warn!("Change stream for {} dropped: {}", table.as_str(), e);
                            break;
                        }
                    }
                }
            }
            Err(e) => warn!("Could not open change stream for {}: {}", table.as_str(), e),
        }

        if cancelled.load(Ordering::SeqCst) {
            return;
        }
        std::thread::sleep(RECONNECT_DELAY);
    }
}

fn open_stream(url: &str, anon_key: &str) -> Result<impl BufRead> {
    let response = ureq::get(url)
        .header("apikey", anon_key)
        .header("Authorization", &format!("Bearer {}", anon_key))
        .call()
        .context("Failed to open change stream")?;

    Ok(BufReader::new(response.into_body().into_reader()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_per_table() {
        let feed = StreamingFeed::new("https://backend.example.com/", "key");

        assert_eq!(
            feed.stream_url(WatchedTable::Conversations),
            "https://backend.example.com/realtime/v1/changes?table=conversations"
        );
        assert_eq!(
            feed.stream_url(WatchedTable::Messages),
            "https://backend.example.com/realtime/v1/changes?table=messages"
        );
    }
}
