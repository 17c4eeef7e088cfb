//! Pagination Tracker
//!
//! "Load more" over provider feeds. Every caller session keeps a cursor per
//! feed: the provider token to resume from and the ids already delivered, so
//! no article is shown twice to the same caller.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use newshub_core::{Article, FeedKey, FeedPage, PageRequest};

use crate::news_cache::{FeedSnapshot, NewsCache, FEED_TTL_SECS};
use crate::news_service::NewsService;
use crate::session::SessionState;

/// Configuration for PaginationTracker
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Lifetime of feed snapshots stored on a cache miss
    pub feed_ttl_secs: u64,
    /// Extra fetches when a page holds nothing new but has a next token
    pub max_empty_page_retries: usize,
    /// Page size for "load more" when the caller gives none
    pub default_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            feed_ttl_secs: FEED_TTL_SECS,
            max_empty_page_retries: 2,
            default_page_size: 10,
        }
    }
}

/// Where a cursor resumes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CursorPosition {
    /// Nothing fetched yet
    #[default]
    Initial,
    /// Resume from a provider token
    Next(String),
    /// The provider returned no next token
    Exhausted,
}

impl CursorPosition {
    fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if !t.is_empty() => CursorPosition::Next(t.to_string()),
            _ => CursorPosition::Exhausted,
        }
    }
}

/// Pagination state for one feed in one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedCursor {
    pub position: CursorPosition,
    /// Ids already delivered; only ever grows
    pub shown_ids: HashSet<String>,
    /// Snapshot this cursor was seeded from
    pub snapshot_version: Option<u64>,
}

impl FeedCursor {
    /// Resume after a cache snapshot unless already seeded from it
    ///
    /// Returns whether the position moved. Delivered ids are recorded
    /// separately with [`FeedCursor::mark_shown`].
    pub fn seed(&mut self, snapshot: &FeedSnapshot) -> bool {
        if self.snapshot_version == Some(snapshot.version) {
            return false;
        }
        self.position = CursorPosition::from_token(snapshot.next_token.as_deref());
        self.snapshot_version = Some(snapshot.version);
        true
    }

    pub fn mark_shown(&mut self, articles: &[Article]) {
        self.shown_ids
            .extend(articles.iter().map(|a| a.id.clone()));
    }
}

/// Result of a "load more" request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadMore {
    pub articles: Vec<Article>,
    pub has_more: bool,
}

/// Global and India headlines shown together
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrontPage {
    pub global: Vec<Article>,
    pub indian: Vec<Article>,
}

impl FrontPage {
    /// Drop India stories already in the global list, then trim both lists
    /// to the same length
    pub fn balanced(global: &[Article], indian: &[Article]) -> Self {
        let global_urls: HashSet<&str> = global.iter().map(|a| a.url.as_str()).collect();
        let mut indian: Vec<Article> = indian
            .iter()
            .filter(|a| !global_urls.contains(a.url.as_str()))
            .cloned()
            .collect();
        let mut global = global.to_vec();

        let len = global.len().min(indian.len());
        global.truncate(len);
        indian.truncate(len);

        Self { global, indian }
    }
}

/// Serves cached feed snapshots and "load more" pages per session
pub struct PaginationTracker {
    news: Arc<NewsService>,
    cache: Arc<NewsCache>,
    config: PaginationConfig,
}

impl PaginationTracker {
    pub fn new(news: Arc<NewsService>, cache: Arc<NewsCache>, config: PaginationConfig) -> Self {
        info!(
            "Initializing PaginationTracker (max empty page retries: {})",
            config.max_empty_page_retries
        );
        Self {
            news,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Current snapshot of `feed`, fetched and cached on a miss
    ///
    /// A failed fetch is not cached.
    async fn load_snapshot(&self, feed: &FeedKey) -> Arc<FeedSnapshot> {
        if let Some(snapshot) = self.cache.snapshot(feed) {
            debug!("Serving cached snapshot v{}", snapshot.version);
            return snapshot;
        }

        let page = self.news.fetch_feed(feed, &PageRequest::Initial).await;
        if page.is_empty() {
            warn!("No articles for {}; not caching", feed);
            return Arc::new(FeedSnapshot::unstored(feed.clone(), page));
        }
        self.cache
            .store(feed, page, Duration::from_secs(self.config.feed_ttl_secs))
    }

    /// Seed the cursor of `feed` from `snapshot` and record what was sent
    ///
    /// A freshly seeded cursor that withheld part of the snapshot restarts
    /// from the first page.
    fn record_delivery(
        session: &mut SessionState,
        feed: &FeedKey,
        snapshot: &FeedSnapshot,
        delivered: &[Article],
    ) {
        if !snapshot.is_stored() {
            return;
        }

        let cursor = session.cursor_mut(feed);
        if cursor.seed(snapshot) && delivered.len() < snapshot.articles.len() {
            debug!(
                "{} of {} articles withheld from {}; restarting cursor",
                snapshot.articles.len() - delivered.len(),
                snapshot.articles.len(),
                feed
            );
            cursor.position = CursorPosition::Initial;
        }
        cursor.mark_shown(delivered);
    }

    /// Current snapshot of `feed`, delivered whole
    ///
    /// The session cursor is seeded from the snapshot. A failed fetch is not
    /// cached and leaves the cursor untouched.
    #[instrument(skip(self, feed, session), fields(feed = %feed))]
    pub async fn open_feed(&self, feed: &FeedKey, session: &mut SessionState) -> Arc<FeedSnapshot> {
        let snapshot = self.load_snapshot(feed).await;
        Self::record_delivery(session, feed, &snapshot, &snapshot.articles);
        snapshot
    }

    /// Open the global and India feeds and combine them
    ///
    /// Only the articles kept on the front page count as shown.
    pub async fn open_front_page(&self, session: &mut SessionState) -> FrontPage {
        let global = self.load_snapshot(&FeedKey::Global).await;
        let indian = self.load_snapshot(&FeedKey::Indian).await;

        let front = FrontPage::balanced(&global.articles, &indian.articles);
        Self::record_delivery(session, &FeedKey::Global, &global, &front.global);
        Self::record_delivery(session, &FeedKey::Indian, &indian, &front.indian);
        info!(
            "Front page: {} global and {} India articles",
            front.global.len(),
            front.indian.len()
        );
        front
    }

    /// First page of a search, seeding the session cursor for that query
    pub async fn search(&self, query: &str, session: &mut SessionState) -> FeedPage {
        let page = self.news.search(query, &PageRequest::Initial).await;
        if page.is_empty() {
            return page;
        }

        let cursor = session.cursor_mut(&FeedKey::Search(query.trim().to_string()));
        cursor.position = CursorPosition::from_token(page.next_token.as_deref());
        cursor.mark_shown(&page.articles);
        page
    }

    /// Next batch of articles the session has not seen yet
    ///
    /// `has_more` is true only when the provider returned a next token and
    /// the batch holds at least one new article.
    #[instrument(skip(self, feed, session), fields(feed = %feed))]
    pub async fn get_more(
        &self,
        feed: &FeedKey,
        session: &mut SessionState,
        page_size: usize,
    ) -> LoadMore {
        let cursor = session.cursor_mut(feed);

        let mut request = match &cursor.position {
            CursorPosition::Exhausted => {
                debug!("Cursor exhausted");
                return LoadMore::default();
            }
            CursorPosition::Initial => PageRequest::Initial,
            CursorPosition::Next(token) => PageRequest::Token(token.clone()),
        };

        let mut attempt = 0;
        loop {
            let page = self.news.fetch_page(feed, &request, page_size).await;

            let articles: Vec<Article> = page
                .articles
                .into_iter()
                .filter(|a| !cursor.shown_ids.contains(&a.id))
                .collect();
            cursor.mark_shown(&articles);
            cursor.position = CursorPosition::from_token(page.next_token.as_deref());

            if !articles.is_empty() {
                let has_more = matches!(cursor.position, CursorPosition::Next(_));
                debug!("Returning {} new articles (has_more: {})", articles.len(), has_more);
                return LoadMore { articles, has_more };
            }

            let token = match &cursor.position {
                CursorPosition::Next(token) if attempt < self.config.max_empty_page_retries => {
                    token.clone()
                }
                _ => {
                    debug!("No new articles after {} retries", attempt);
                    return LoadMore::default();
                }
            };

            attempt += 1;
            debug!("Page held nothing new; retry {} with next token", attempt);
            request = PageRequest::Token(token);
        }
    }
}
