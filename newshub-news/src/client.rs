//! NewsData.io API client
//!
//! Issues one GET per page with the primary API key and retries once with the
//! fallback key when the primary key is missing, or the primary call errors or
//! returns a non-success status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, error, info, instrument, warn};

use newshub_core::{FeedKey, PageRequest};

use crate::config::NewsDataConfig;
use crate::error::NewsError;
use crate::types::{NewsDataResponse, RawArticle, RawPage};

/// Query used for the India feed
const INDIAN_NEWS_QUERY: &str = "India OR Delhi OR Mumbai";

/// Provider category used for breaking news
const BREAKING_CATEGORY: &str = "top";

/// Parameters for one provider request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderQuery {
    /// Articles per page
    pub size: Option<usize>,
    pub category: Option<String>,
    pub country: Option<String>,
    /// Free-text query
    pub q: Option<String>,
    /// Opaque page token
    pub page: Option<String>,
}

impl ProviderQuery {
    /// Build the request for a page of a feed
    pub fn for_feed(feed: &FeedKey, page: &PageRequest, size: usize) -> Self {
        let mut query = Self {
            size: Some(size),
            page: page.token().filter(|t| !t.is_empty()).map(String::from),
            ..Self::default()
        };

        match feed {
            FeedKey::Global => {}
            FeedKey::Indian => query.q = Some(INDIAN_NEWS_QUERY.to_string()),
            FeedKey::Breaking => query.category = Some(BREAKING_CATEGORY.to_string()),
            FeedKey::Category(category) => query.category = Some(category.to_string()),
            FeedKey::Search(q) => query.q = Some(q.clone()),
            FeedKey::Local(locality) => {
                query.country = Some(locality.country.clone());
                query.q = locality.query();
            }
        }

        query
    }
}

/// Anything that can produce raw provider pages
///
/// Implementations never fail: transport and provider errors become
/// [`RawPage::empty`].
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_page(&self, query: &ProviderQuery) -> RawPage;
}

/// NewsData.io API client
pub struct NewsDataClient {
    client: Client,
    config: NewsDataConfig,
}

impl NewsDataClient {
    /// Create a new client
    pub fn new(config: NewsDataConfig) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NewsError::InvalidConfig(e.to_string()))?;

        if config.api_key.is_none() && config.fallback_api_key.is_none() {
            error!("No NewsData API key is set; provider requests will return no results");
        } else {
            info!(
                "NewsData client ready (fallback key: {})",
                config.fallback_api_key.is_some()
            );
        }

        Ok(Self { client, config })
    }

    fn build_params(&self, query: &ProviderQuery, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apikey", api_key.to_string()),
            ("language", self.config.language.clone()),
        ];

        if let Some(size) = query.size {
            params.push(("size", size.to_string()));
        }
        if let Some(ref category) = query.category {
            params.push(("category", category.clone()));
        }
        if let Some(ref country) = query.country {
            params.push(("country", country.clone()));
        }
        if let Some(ref q) = query.q {
            params.push(("q", q.clone()));
        }
        if let Some(ref page) = query.page {
            params.push(("page", page.clone()));
        }

        params
    }

    async fn send_with_key(
        &self,
        query: &ProviderQuery,
        api_key: &str,
    ) -> Result<Response, NewsError> {
        self.client
            .get(&self.config.base_url)
            .query(&self.build_params(query, api_key))
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))
    }

    /// Request with the primary key, failing on a missing key or a
    /// non-success status
    async fn send_primary(&self, query: &ProviderQuery) -> Result<Response, NewsError> {
        let primary = self.config.api_key.as_deref().ok_or(NewsError::MissingApiKey)?;
        let response = self.send_with_key(query, primary).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::ApiError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        Ok(response)
    }

    /// Send the request, falling back to the secondary key once
    ///
    /// Returns `None` when no usable response could be obtained. A response
    /// obtained with the fallback key is returned whatever its status.
    pub async fn request(&self, query: &ProviderQuery) -> Option<Response> {
        match self.send_primary(query).await {
            Ok(response) => return Some(response),
            Err(e) => warn!("Primary API key failed: {}. Trying fallback key if available.", e),
        }

        let Some(ref fallback) = self.config.fallback_api_key else {
            error!("No fallback API key configured");
            return None;
        };
        match self.send_with_key(query, fallback).await {
            Ok(response) => Some(response),
            Err(e) => {
                error!("Fallback API key request error: {}", e);
                None
            }
        }
    }

    async fn parse_response(response: Response) -> Result<RawPage, NewsError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NewsError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: NewsDataResponse = response
            .json()
            .await
            .map_err(|e| NewsError::ParseError(e.to_string()))?;

        if data.status != "success" {
            return Err(NewsError::ApiError {
                status: status.as_u16(),
                message: data.results.to_string(),
            });
        }

        let results: Vec<RawArticle> = if data.results.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(data.results).map_err(|e| NewsError::ParseError(e.to_string()))?
        };

        Ok(RawPage {
            results,
            next_page: data.next_page.filter(|t| !t.is_empty()),
            suggested_query: data.suggested_query.filter(|q| !q.is_empty()),
        })
    }
}

#[async_trait]
impl ArticleSource for NewsDataClient {
    #[instrument(skip(self), fields(q = ?query.q, category = ?query.category))]
    async fn fetch_page(&self, query: &ProviderQuery) -> RawPage {
        let Some(response) = self.request(query).await else {
            error!("No response from NewsData API");
            return RawPage::empty();
        };

        match Self::parse_response(response).await {
            Ok(page) => {
                info!(
                    "Received {} articles from NewsData (next page: {})",
                    page.results.len(),
                    page.next_page.is_some()
                );
                debug!("Next page token: {:?}", page.next_page);
                page
            }
            Err(e) => {
                error!("NewsData request failed: {}", e);
                RawPage::empty()
            }
        }
    }
}
