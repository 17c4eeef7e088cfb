//! Feed Refresher
//!
//! Background service that periodically refetches the core feeds into the
//! news cache, refreshes the daily fact and expires idle sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, info, warn};

use newshub_core::{FeedKey, PageRequest};

use crate::facts_service::FactsService;
use crate::news_cache::{NewsCache, FEED_TTL_SECS};
use crate::news_service::NewsService;
use crate::session::SessionStore;

/// Configuration for FeedRefresher
#[derive(Debug, Clone)]
pub struct RefresherConfig {
    /// How often to refetch the core feeds (in seconds)
    pub interval_secs: u64,
    /// Lifetime of refreshed snapshots (in seconds)
    pub feed_ttl_secs: u64,
    /// How often to expire idle sessions (in seconds)
    pub session_sweep_secs: u64,
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30 * 60,
            feed_ttl_secs: FEED_TTL_SECS,
            session_sweep_secs: 5 * 60,
        }
    }
}

/// Outcome of one refresh pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub refreshed: usize,
    pub failed: Vec<String>,
}

/// Background service keeping the news cache warm
pub struct FeedRefresher {
    news: Arc<NewsService>,
    cache: Arc<NewsCache>,
    facts: Arc<FactsService>,
    sessions: Arc<SessionStore>,
    config: RefresherConfig,
}

impl FeedRefresher {
    pub fn new(
        news: Arc<NewsService>,
        cache: Arc<NewsCache>,
        facts: Arc<FactsService>,
        sessions: Arc<SessionStore>,
        config: RefresherConfig,
    ) -> Self {
        info!("Initializing FeedRefresher");
        Self {
            news,
            cache,
            facts,
            sessions,
            config,
        }
    }

    /// Start the background loops
    pub async fn start(self: Arc<Self>) {
        info!(
            "Starting FeedRefresher with refresh interval {}s, session sweep {}s",
            self.config.interval_secs, self.config.session_sweep_secs
        );

        let self_refresh = Arc::clone(&self);
        let self_sweep = Arc::clone(&self);

        // Spawn feed refresh task
        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(self_refresh.config.interval_secs));
            loop {
                ticker.tick().await;
                let report = self_refresh.refresh_once().await;
                info!(
                    "Refreshed {} feeds ({} failed)",
                    report.refreshed,
                    report.failed.len()
                );
            }
        });

        // Spawn session and cache cleanup task
        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(self_sweep.config.session_sweep_secs));
            loop {
                ticker.tick().await;
                self_sweep.sessions.purge_idle();
                let purged = self_sweep.cache.purge_expired();
                if purged > 0 {
                    debug!("Purged {} expired cache entries", purged);
                }
            }
        });
    }

    /// Refetch every core feed and the daily fact
    ///
    /// A feed that comes back empty keeps its previous snapshot.
    pub async fn refresh_once(&self) -> RefreshReport {
        let ttl = Duration::from_secs(self.config.feed_ttl_secs);
        let mut report = RefreshReport::default();

        for feed in FeedKey::core_feeds() {
            let page = self.news.fetch_feed(&feed, &PageRequest::Initial).await;
            if page.is_empty() {
                warn!("Refresh of {} returned no articles", feed);
                report.failed.push(feed.to_string());
                continue;
            }
            self.cache.store(&feed, page, ttl);
            report.refreshed += 1;
        }

        self.facts.daily_fact(true).await;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts_service::FactsConfig;
    use crate::news_service::NewsServiceConfig;
    use crate::testing::{page_of, ScriptedSource};
    use newshub_core::Category;
    use newshub_news::RawPage;

    #[tokio::test]
    async fn test_refresh_once_stores_core_feeds() {
        let mut pages = vec![
            page_of(&["g1"], Some("gt")),
            RawPage::empty(), // India feed fails
        ];
        for (i, _) in Category::ALL.iter().enumerate() {
            let id = format!("c{}", i);
            pages.push(page_of(&[id.as_str()], None));
        }

        let source = Arc::new(ScriptedSource::new(pages));
        let news = Arc::new(NewsService::new(source.clone(), NewsServiceConfig::default()).unwrap());
        let cache = Arc::new(NewsCache::new());
        let facts = Arc::new(
            FactsService::new(
                cache.clone(),
                FactsConfig {
                    url: "http://127.0.0.1:1/facts/random".to_string(),
                    ..FactsConfig::default()
                },
            )
            .unwrap(),
        );
        let refresher = FeedRefresher::new(
            news,
            cache.clone(),
            facts,
            Arc::new(SessionStore::new(Duration::from_secs(60))),
            RefresherConfig::default(),
        );

        let report = refresher.refresh_once().await;

        assert_eq!(report.refreshed, 1 + Category::ALL.len());
        assert_eq!(report.failed, vec!["indian".to_string()]);
        assert_eq!(source.queries().len(), 2 + Category::ALL.len());

        let global = cache.snapshot(&FeedKey::Global).unwrap();
        assert_eq!(global.next_token.as_deref(), Some("gt"));
        assert!(cache.snapshot(&FeedKey::Indian).is_none());
        assert!(cache
            .snapshot(&FeedKey::Category(Category::Technology))
            .is_some());
    }
}
