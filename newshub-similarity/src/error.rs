//! Error types for similarity operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimilarityError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimilarityError {
    /// Every token in the batch was a stop word (or there were no tokens)
    #[error("Empty vocabulary; documents contain only stop words")]
    EmptyVocabulary,

    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Invalid threshold {0}; must be within 0.0..=1.0")]
    InvalidThreshold(f64),
}
