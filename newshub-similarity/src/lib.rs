//! Content similarity for news articles
//!
//! This crate detects near-duplicate stories inside a single fetched batch.
//!
//! ## Features
//! - TF-IDF vectorization with English stop-word removal
//! - Cosine similarity between document vectors
//! - Greedy first-seen deduplication above a configurable threshold

pub mod dedup;
pub mod error;
pub mod similarity;
pub mod stop_words;
pub mod tfidf;

pub use dedup::{DEFAULT_SIMILARITY_THRESHOLD, Deduplicator};
pub use error::{Result, SimilarityError};
pub use similarity::{cosine_similarity, similarity_matrix};
pub use tfidf::TfidfVectorizer;
