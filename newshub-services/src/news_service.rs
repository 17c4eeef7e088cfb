//! News Service
//!
//! Runs the fetch pipeline for a feed page: provider request, normalization,
//! near-duplicate removal and enrichment.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use newshub_core::{FeedKey, FeedPage, PageRequest};
use newshub_news::{normalize_batch, ArticleSource, ProviderQuery};
use newshub_similarity::{Deduplicator, DEFAULT_SIMILARITY_THRESHOLD};

use crate::enrichment::{ArticleAnnotator, Enricher, KeywordAnnotator};
use crate::error::{ConfigError, ServiceError};

/// Configuration for NewsService
#[derive(Debug, Clone)]
pub struct NewsServiceConfig {
    /// Similarity above which two articles in a batch are duplicates
    pub similarity_threshold: f64,
    /// Articles per page for the global and India feeds
    pub front_page_size: usize,
    /// Articles per page for category feeds
    pub category_page_size: usize,
    /// Articles per page for searches and local feeds
    pub search_page_size: usize,
    /// Articles per page for breaking news (provider category `top`; no
    /// live-only filter is sent)
    pub breaking_page_size: usize,
}

impl Default for NewsServiceConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            front_page_size: 5,
            category_page_size: 20,
            search_page_size: 10,
            breaking_page_size: 5,
        }
    }
}

impl NewsServiceConfig {
    /// Default page size for a feed
    pub fn page_size_for(&self, feed: &FeedKey) -> usize {
        match feed {
            FeedKey::Global | FeedKey::Indian => self.front_page_size,
            FeedKey::Category(_) => self.category_page_size,
            FeedKey::Breaking => self.breaking_page_size,
            FeedKey::Search(_) | FeedKey::Local(_) => self.search_page_size,
        }
    }
}

/// Fetch pipeline over an [`ArticleSource`]
pub struct NewsService {
    source: Arc<dyn ArticleSource>,
    deduplicator: Deduplicator,
    enricher: Enricher,
    config: NewsServiceConfig,
}

impl NewsService {
    /// Create a NewsService with the keyword annotator
    pub fn new(
        source: Arc<dyn ArticleSource>,
        config: NewsServiceConfig,
    ) -> Result<Self, ServiceError> {
        Self::with_annotator(source, Arc::new(KeywordAnnotator::new()), config)
    }

    pub fn with_annotator(
        source: Arc<dyn ArticleSource>,
        annotator: Arc<dyn ArticleAnnotator>,
        config: NewsServiceConfig,
    ) -> Result<Self, ServiceError> {
        let deduplicator =
            Deduplicator::new(config.similarity_threshold).map_err(ConfigError::from)?;

        info!(
            "Initializing NewsService (similarity threshold: {})",
            config.similarity_threshold
        );
        Ok(Self {
            source,
            deduplicator,
            enricher: Enricher::new(annotator),
            config,
        })
    }

    /// Threshold the deduplicator is running with
    pub fn similarity_threshold(&self) -> f64 {
        self.deduplicator.threshold()
    }

    /// Fetch one page of a feed at its default page size
    pub async fn fetch_feed(&self, feed: &FeedKey, page: &PageRequest) -> FeedPage {
        self.fetch_page(feed, page, self.config.page_size_for(feed))
            .await
    }

    /// Fetch one page of a feed
    ///
    /// Provider failures yield an empty page with no next token.
    #[instrument(skip(self, feed), fields(feed = %feed))]
    pub async fn fetch_page(&self, feed: &FeedKey, page: &PageRequest, size: usize) -> FeedPage {
        let query = ProviderQuery::for_feed(feed, page, size);
        let raw = self.source.fetch_page(&query).await;

        let normalized = normalize_batch(&raw.results);
        let fetched = normalized.len();
        let mut articles = self.deduplicator.dedup(normalized);
        self.enricher.enrich(&mut articles).await;

        debug!(
            "Feed {}: {} raw, {} normalized, {} after dedup",
            feed,
            raw.results.len(),
            fetched,
            articles.len()
        );

        let suggested_query = match feed {
            FeedKey::Search(q) => raw
                .suggested_query
                .filter(|s| !s.trim().is_empty() && !s.trim().eq_ignore_ascii_case(q.trim())),
            _ => None,
        };

        FeedPage {
            articles,
            next_token: raw.next_page.filter(|t| !t.is_empty()),
            suggested_query,
        }
    }

    /// Search all news
    ///
    /// An empty query returns an empty page without calling the provider.
    pub async fn search(&self, query: &str, page: &PageRequest) -> FeedPage {
        let query = query.trim();
        if query.is_empty() {
            return FeedPage::empty();
        }

        info!("Searching news for: {}", query);
        self.fetch_feed(&FeedKey::Search(query.to_string()), page)
            .await
    }
}
