//! Caller sessions
//!
//! Each caller session owns one pagination cursor per feed. Sessions are held
//! behind an async mutex so concurrent requests from the same caller run one
//! after another, and are dropped after an idle TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use newshub_core::FeedKey;

use crate::pagination::FeedCursor;

/// Per-caller pagination state
#[derive(Debug, Default)]
pub struct SessionState {
    cursors: HashMap<FeedKey, FeedCursor>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self, feed: &FeedKey) -> Option<&FeedCursor> {
        self.cursors.get(feed)
    }

    /// Cursor for `feed`, created in its initial position on first use
    pub fn cursor_mut(&mut self, feed: &FeedKey) -> &mut FeedCursor {
        self.cursors.entry(feed.clone()).or_default()
    }

    pub fn feed_count(&self) -> usize {
        self.cursors.len()
    }
}

/// Shared handle to one session
pub type SessionHandle = Arc<Mutex<SessionState>>;

#[derive(Debug)]
struct SessionEntry {
    state: SessionHandle,
    last_seen: Instant,
}

/// All live caller sessions
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        info!("Initializing SessionStore with idle TTL {}s", idle_ttl.as_secs());
        Self {
            sessions: DashMap::new(),
            idle_ttl,
        }
    }

    /// Generate a fresh random session id
    pub fn new_session_id() -> String {
        hex::encode(rand::random::<[u8; 16]>())
    }

    /// Handle for `id`, creating the session if needed and marking it active
    pub fn session(&self, id: &str) -> SessionHandle {
        let mut entry = self.sessions.entry(id.to_string()).or_insert_with(|| {
            debug!("New session {}", id);
            SessionEntry {
                state: Arc::new(Mutex::new(SessionState::new())),
                last_seen: Instant::now(),
            }
        });
        entry.last_seen = Instant::now();
        Arc::clone(&entry.state)
    }

    /// Drop sessions idle for longer than the TTL
    pub fn purge_idle(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() <= self.idle_ttl);
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            info!("Expired {} idle sessions", purged);
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
