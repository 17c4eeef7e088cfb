//! News data structures shared by the fetch pipeline and the API

use serde::{Deserialize, Serialize};

/// Title used when the provider omits one
pub const UNTITLED_ARTICLE: &str = "Untitled Article";

/// Source name used when the provider omits one
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// Image shown for articles without a thumbnail
pub const PLACEHOLDER_IMAGE_URL: &str = "/static/img/news-placeholder.svg";

/// A canonical news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Provider article id, or the URL when the provider issued none
    pub id: String,
    /// Article title
    pub title: String,
    /// Short description from the provider
    pub description: String,
    /// Canonical link
    pub url: String,
    /// Publishing outlet
    pub source: String,
    /// Human-formatted publication date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Thumbnail URL
    pub image_url: String,
    /// Generated summary (set by the enricher)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Sentiment label such as "POSITIVE" (set by the enricher)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    /// Topic and keyword tags (set by the enricher)
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Article {
    /// Text used for similarity scoring and annotation
    pub fn similarity_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// One page of a feed as returned by the fetch pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    /// Articles in display order
    pub articles: Vec<Article>,
    /// Opaque provider token for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    /// Spelling correction offered by the provider for searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_query: Option<String>,
}

impl FeedPage {
    /// An empty page with no continuation
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// A "did you know" fact shown on the front page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFact {
    pub text: String,
    pub source: String,
    pub permalink: String,
}
