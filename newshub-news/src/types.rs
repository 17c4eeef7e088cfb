//! NewsData.io wire types

use serde::Deserialize;

/// Top-level NewsData.io response
///
/// `results` is an array on success but an error object on failure, so it is
/// kept as a raw value until `status` has been checked.
#[derive(Debug, Deserialize)]
pub struct NewsDataResponse {
    /// "success" or "error"
    pub status: String,
    /// Article array (or error details)
    #[serde(default)]
    pub results: serde_json::Value,
    /// Opaque token for the next page
    #[serde(rename = "nextPage", default)]
    pub next_page: Option<String>,
    /// Spelling correction for free-text queries
    #[serde(default)]
    pub suggested_query: Option<String>,
}

/// A single article as sent by the provider
///
/// Every field is optional; the normalizer decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub article_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Article URL
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
    /// Provider timestamp, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "pubDate", default)]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One provider page after transport and status checks
#[derive(Debug, Clone, Default)]
pub struct RawPage {
    pub results: Vec<RawArticle>,
    pub next_page: Option<String>,
    pub suggested_query: Option<String>,
}

impl RawPage {
    pub fn empty() -> Self {
        Self::default()
    }
}
