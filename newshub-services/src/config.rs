//! Service configuration loaded from the environment

use std::env;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::feed_refresher::RefresherConfig;
use crate::news_service::NewsServiceConfig;
use crate::pagination::PaginationConfig;

/// Default idle time before a caller session is dropped (30 minutes)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

/// All service-layer settings
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    pub news: NewsServiceConfig,
    pub pagination: PaginationConfig,
    pub refresher: RefresherConfig,
    pub session_ttl_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            news: NewsServiceConfig::default(),
            pagination: PaginationConfig::default(),
            refresher: RefresherConfig::default(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl ServicesConfig {
    /// Load configuration from environment variables
    ///
    /// Reads:
    /// - NEWSHUB_SIMILARITY_THRESHOLD
    /// - NEWSHUB_FEED_TTL_SECS
    /// - NEWSHUB_REFRESH_INTERVAL_SECS
    /// - NEWSHUB_SESSION_TTL_SECS
    /// - NEWSHUB_MAX_EMPTY_PAGE_RETRIES
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(threshold) = env_parse("NEWSHUB_SIMILARITY_THRESHOLD")? {
            config.news.similarity_threshold = threshold;
        }
        if let Some(ttl) = env_parse("NEWSHUB_FEED_TTL_SECS")? {
            config.pagination.feed_ttl_secs = ttl;
            config.refresher.feed_ttl_secs = ttl;
        }
        if let Some(interval) = env_parse("NEWSHUB_REFRESH_INTERVAL_SECS")? {
            config.refresher.interval_secs = interval;
        }
        if let Some(ttl) = env_parse("NEWSHUB_SESSION_TTL_SECS")? {
            config.session_ttl_secs = ttl;
        }
        if let Some(retries) = env_parse("NEWSHUB_MAX_EMPTY_PAGE_RETRIES")? {
            config.pagination.max_empty_page_retries = retries;
        }

        Ok(config)
    }
}

/// Parse an optional environment variable
pub(crate) fn env_parse<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
        _ => Ok(None),
    }
}
