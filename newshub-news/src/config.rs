//! NewsData.io client configuration

use std::env;

use crate::error::NewsError;

pub const DEFAULT_BASE_URL: &str = "https://newsdata.io/api/1/news";

/// Configuration for [`crate::NewsDataClient`]
#[derive(Debug, Clone)]
pub struct NewsDataConfig {
    /// Primary API key
    pub api_key: Option<String>,
    /// Key tried once when the primary request fails
    pub fallback_api_key: Option<String>,
    /// News endpoint URL
    pub base_url: String,
    /// Language filter sent with every request
    pub language: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for NewsDataConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            fallback_api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "en".to_string(),
            timeout_secs: 15,
        }
    }
}

impl NewsDataConfig {
    /// Load configuration from environment variables
    ///
    /// Reads:
    /// - NEWSDATA_API_KEY
    /// - NEWSDATA_API_KEY_FALLBACK
    /// - NEWSDATA_BASE_URL
    /// - NEWSDATA_LANGUAGE
    /// - NEWSDATA_TIMEOUT_SECS
    pub fn from_env() -> Result<Self, NewsError> {
        let defaults = Self::default();

        let timeout_secs = match env::var("NEWSDATA_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                NewsError::InvalidConfig(format!("NEWSDATA_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            Err(_) => defaults.timeout_secs,
        };

        Ok(Self {
            api_key: non_empty_var("NEWSDATA_API_KEY"),
            fallback_api_key: non_empty_var("NEWSDATA_API_KEY_FALLBACK"),
            base_url: non_empty_var("NEWSDATA_BASE_URL").unwrap_or(defaults.base_url),
            language: non_empty_var("NEWSDATA_LANGUAGE").unwrap_or(defaults.language),
            timeout_secs,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
