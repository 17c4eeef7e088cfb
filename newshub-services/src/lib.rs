//! Business logic services for NewsHub
//!
//! This crate provides the service layer between the provider client and the
//! HTTP API: the fetch pipeline, feed snapshots, per-session pagination,
//! enrichment, the daily fact and the background refresher.

pub mod cache;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod facts_service;
pub mod feed_refresher;
pub mod news_cache;
pub mod news_service;
pub mod pagination;
pub mod session;

#[cfg(test)]
mod testing;

pub use cache::TtlCache;
pub use config::ServicesConfig;
pub use enrichment::{Annotation, ArticleAnnotator, Enricher, KeywordAnnotator, Sentiment};
pub use error::{ConfigError, ServiceError};
pub use facts_service::{FactsConfig, FactsService};
pub use feed_refresher::{FeedRefresher, RefreshReport, RefresherConfig};
pub use news_cache::{FeedSnapshot, NewsCache};
pub use news_service::{NewsService, NewsServiceConfig};
pub use pagination::{
    CursorPosition, FeedCursor, FrontPage, LoadMore, PaginationConfig, PaginationTracker,
};
pub use session::{SessionHandle, SessionState, SessionStore};
