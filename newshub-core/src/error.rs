//! Error types for NewsHub

use thiserror::Error;

/// NewsHub-wide error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NewsHubError {
    #[error("Invalid feed key: {0}")]
    InvalidFeedKey(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),
}

impl NewsHubError {
    pub fn invalid_feed_key(msg: impl Into<String>) -> Self {
        NewsHubError::InvalidFeedKey(msg.into())
    }

    pub fn invalid_category(msg: impl Into<String>) -> Self {
        NewsHubError::InvalidCategory(msg.into())
    }
}
