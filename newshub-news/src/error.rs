//! Error types for the news provider module

use thiserror::Error;

/// Errors that can occur while talking to the news provider
///
/// These never cross the crate boundary through [`crate::ArticleSource`];
/// they are logged and turned into empty pages there.
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Failed to parse API response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No API key is configured
    #[error("Missing API key")]
    MissingApiKey,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
