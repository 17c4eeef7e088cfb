//! News provider client for NewsHub
//!
//! This crate provides:
//! - NewsData.io: paged headline and search requests with primary/fallback keys
//! - Normalization of provider articles into the canonical `Article`

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{ArticleSource, NewsDataClient, ProviderQuery};
pub use config::NewsDataConfig;
pub use error::NewsError;
pub use normalize::{format_date, normalize, normalize_batch};
pub use types::{RawArticle, RawPage};
