//! Error types for the service layer

use thiserror::Error;

use newshub_similarity::SimilarityError;

/// Errors raised while loading service configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Invalid similarity threshold: {0}")]
    Similarity(#[from] SimilarityError),
}

/// Errors that can occur in the service layer
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Annotation failed: {0}")]
    Annotation(String),
}
