//! In-memory TTL cache
//!
//! Keyed string cache with per-entry expiration. Expired entries are dropped
//! lazily on read; once the cache grows past its entry threshold, inserts
//! first sweep expired entries and then evict the oldest one.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

/// Entry count beyond which inserts start evicting
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    inserted_at: Instant,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            data,
            inserted_at: now,
            expires_at: now + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Concurrent cache where every entry carries its own TTL
///
/// Writes to one key are atomic; the last writer wins.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    max_entries: usize,
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl<V: Clone> TtlCache<V> {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Live value for `key`, if any
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired() {
                return Some(entry.data.clone());
            }
        }

        self.entries.remove_if(key, |_, entry| entry.is_expired());
        None
    }

    /// Store `value` under `key` for `ttl`
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();

        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.make_room();
        }

        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self) {
        let purged = self.purge_expired();
        if purged > 0 {
            debug!("Purged {} expired cache entries", purged);
        }
        if self.entries.len() < self.max_entries {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            debug!("Evicting oldest cache entry: {}", key);
            self.entries.remove(&key);
        }
    }
}
