//! Core types for NewsHub
//!
//! This crate defines the shared data structures used across the workspace:
//! the canonical article record, feed identities and the error type.

pub mod error;
pub mod feed;
pub mod news;

pub use error::NewsHubError;
pub use feed::{Category, FeedKey, Locality, PageRequest};
pub use news::{
    Article, DailyFact, FeedPage, PLACEHOLDER_IMAGE_URL, UNKNOWN_SOURCE, UNTITLED_ARTICLE,
};
