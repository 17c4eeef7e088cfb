//! News Cache
//!
//! Process-wide store of feed snapshots and the daily fact. Every refresh of a
//! feed produces a new immutable snapshot with a strictly increasing version;
//! readers hold an `Arc` to the snapshot they were served.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use newshub_core::{Article, DailyFact, FeedKey, FeedPage};

use crate::cache::TtlCache;

/// Default lifetime of a feed snapshot (30 minutes)
pub const FEED_TTL_SECS: u64 = 30 * 60;

/// Default lifetime of the daily fact (24 hours)
pub const FACT_TTL_SECS: u64 = 24 * 60 * 60;

const FACT_KEY: &str = "daily_fact";

/// Result of one cache refresh of a feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    /// Process-wide version; 0 marks a snapshot that was never stored
    pub version: u64,
    #[serde(serialize_with = "serialize_feed_key")]
    pub feed_key: FeedKey,
    pub articles: Vec<Article>,
    pub next_token: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl FeedSnapshot {
    /// A snapshot for a failed fetch; it is never cached
    pub fn unstored(feed_key: FeedKey, page: FeedPage) -> Self {
        Self {
            version: 0,
            feed_key,
            articles: page.articles,
            next_token: page.next_token,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_stored(&self) -> bool {
        self.version > 0
    }
}

fn serialize_feed_key<S: serde::Serializer>(key: &FeedKey, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(key)
}

/// Shared cache for feed snapshots and the daily fact
#[derive(Debug)]
pub struct NewsCache {
    snapshots: TtlCache<Arc<FeedSnapshot>>,
    facts: TtlCache<DailyFact>,
    next_version: AtomicU64,
}

impl Default for NewsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl NewsCache {
    pub fn new() -> Self {
        Self {
            snapshots: TtlCache::default(),
            facts: TtlCache::default(),
            next_version: AtomicU64::new(1),
        }
    }

    /// Live snapshot for `feed_key`, if any
    pub fn snapshot(&self, feed_key: &FeedKey) -> Option<Arc<FeedSnapshot>> {
        self.snapshots.get(&feed_key.to_string())
    }

    /// Store `page` as the newest snapshot of `feed_key`
    pub fn store(&self, feed_key: &FeedKey, page: FeedPage, ttl: Duration) -> Arc<FeedSnapshot> {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        let snapshot = Arc::new(FeedSnapshot {
            version,
            feed_key: feed_key.clone(),
            articles: page.articles,
            next_token: page.next_token,
            fetched_at: Utc::now(),
        });

        debug!(
            "Stored snapshot v{} for {} ({} articles)",
            version,
            feed_key,
            snapshot.articles.len()
        );
        self.snapshots
            .set(feed_key.to_string(), Arc::clone(&snapshot), ttl);
        snapshot
    }

    /// Cached daily fact, if still fresh
    pub fn fact(&self) -> Option<DailyFact> {
        self.facts.get(FACT_KEY)
    }

    pub fn store_fact(&self, fact: DailyFact, ttl: Duration) {
        self.facts.set(FACT_KEY, fact, ttl);
    }

    /// Drop expired snapshots and facts
    pub fn purge_expired(&self) -> usize {
        self.snapshots.purge_expired() + self.facts.purge_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newshub_core::{Category, PLACEHOLDER_IMAGE_URL};

    const TTL: Duration = Duration::from_secs(FEED_TTL_SECS);

    fn page(ids: &[&str], next: Option<&str>) -> FeedPage {
        FeedPage {
            articles: ids
                .iter()
                .map(|id| Article {
                    id: id.to_string(),
                    title: format!("Title {}", id),
                    description: format!("Description {}", id),
                    url: format!("https://news.example/{}", id),
                    source: "example".to_string(),
                    published_at: None,
                    image_url: PLACEHOLDER_IMAGE_URL.to_string(),
                    summary: None,
                    sentiment: None,
                    tags: Vec::new(),
                })
                .collect(),
            next_token: next.map(String::from),
            suggested_query: None,
        }
    }

    #[test]
    fn test_versions_strictly_increase() {
        let cache = NewsCache::new();
        let global = cache.store(&FeedKey::Global, page(&["a"], Some("t1")), TTL);
        let tech = cache.store(
            &FeedKey::Category(Category::Technology),
            page(&["b"], None),
            TTL,
        );
        let global_again = cache.store(&FeedKey::Global, page(&["c"], None), TTL);

        assert!(global.version >= 1);
        assert!(tech.version > global.version);
        assert!(global_again.version > tech.version);
    }

    #[test]
    fn test_snapshot_is_immutable_for_holders() {
        let cache = NewsCache::new();
        let first = cache.store(&FeedKey::Global, page(&["a"], Some("t1")), TTL);
        cache.store(&FeedKey::Global, page(&["b"], Some("t2")), TTL);

        assert_eq!(first.articles[0].id, "a");
        let live = cache.snapshot(&FeedKey::Global).unwrap();
        assert_eq!(live.articles[0].id, "b");
        assert_eq!(live.next_token.as_deref(), Some("t2"));
    }

    #[test]
    fn test_feeds_are_keyed_separately() {
        let cache = NewsCache::new();
        cache.store(&FeedKey::Global, page(&["a"], None), TTL);

        assert!(cache.snapshot(&FeedKey::Indian).is_none());
        assert!(cache.snapshot(&FeedKey::Global).is_some());
    }

    #[test]
    fn test_fact_round_trip() {
        let cache = NewsCache::new();
        assert!(cache.fact().is_none());

        let fact = DailyFact {
            text: "Honey never spoils.".to_string(),
            source: "NewsHub".to_string(),
            permalink: String::new(),
        };
        cache.store_fact(fact.clone(), Duration::from_secs(FACT_TTL_SECS));
        assert_eq!(cache.fact(), Some(fact));
    }
}
