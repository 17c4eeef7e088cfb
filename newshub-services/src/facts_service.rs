//! Facts Service
//!
//! Fetches a random "did you know" fact and keeps it for a day.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use newshub_core::DailyFact;

use crate::error::ServiceError;
use crate::news_cache::{NewsCache, FACT_TTL_SECS};

pub const DEFAULT_FACTS_URL: &str = "https://uselessfacts.jsph.pl/api/v2/facts/random";

/// Source label attached to every fact
pub const FACT_SOURCE: &str = "NewsHub";

const UNAVAILABLE_FACT: &str =
    "Did you know? The internet is full of interesting facts, but sometimes they're hard to find!";
const UNREACHABLE_FACT: &str =
    "Did you know? Even the most reliable systems sometimes need a break!";

#[derive(Debug, Deserialize)]
struct RandomFact {
    text: String,
    #[serde(default)]
    permalink: Option<String>,
}

/// Configuration for FactsService
#[derive(Debug, Clone)]
pub struct FactsConfig {
    pub url: String,
    pub timeout_secs: u64,
    /// How long a fetched fact is reused
    pub ttl_secs: u64,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FACTS_URL.to_string(),
            timeout_secs: 10,
            ttl_secs: FACT_TTL_SECS,
        }
    }
}

pub struct FactsService {
    client: Client,
    cache: Arc<NewsCache>,
    config: FactsConfig,
}

impl FactsService {
    pub fn new(cache: Arc<NewsCache>, config: FactsConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            cache,
            config,
        })
    }

    /// The fact of the day
    ///
    /// Served from cache unless `force_new`; failures yield a fixed fallback
    /// fact that is not cached.
    pub async fn daily_fact(&self, force_new: bool) -> DailyFact {
        if !force_new {
            if let Some(fact) = self.cache.fact() {
                debug!("Serving cached fact");
                return fact;
            }
        }

        match self.fetch().await {
            Ok(Some(fact)) => {
                info!("Fetched new daily fact");
                self.cache
                    .store_fact(fact.clone(), Duration::from_secs(self.config.ttl_secs));
                fact
            }
            Ok(None) => fallback(UNAVAILABLE_FACT),
            Err(e) => {
                error!("Error fetching fact: {}", e);
                fallback(UNREACHABLE_FACT)
            }
        }
    }

    async fn fetch(&self) -> Result<Option<DailyFact>, reqwest::Error> {
        let response = self.client.get(&self.config.url).send().await?;

        if response.status() != reqwest::StatusCode::OK {
            warn!("Facts API returned {}", response.status());
            return Ok(None);
        }

        let fact: RandomFact = response.json().await?;
        Ok(Some(DailyFact {
            text: fact.text,
            source: FACT_SOURCE.to_string(),
            permalink: fact.permalink.unwrap_or_default(),
        }))
    }
}

fn fallback(text: &str) -> DailyFact {
    DailyFact {
        text: text.to_string(),
        source: FACT_SOURCE.to_string(),
        permalink: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(url: String) -> (FactsService, Arc<NewsCache>) {
        let cache = Arc::new(NewsCache::new());
        let config = FactsConfig {
            url,
            timeout_secs: 5,
            ..FactsConfig::default()
        };
        (FactsService::new(cache.clone(), config).unwrap(), cache)
    }

    #[tokio::test]
    async fn test_fetches_and_caches_fact() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/facts/random")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"1","text":"Octopuses have three hearts.","permalink":"https://facts.example/1"}"#)
            .expect(1)
            .create_async()
            .await;

        let (facts, cache) = service(format!("{}/facts/random", server.url()));

        let first = facts.daily_fact(false).await;
        let second = facts.daily_fact(false).await;

        assert_eq!(first.text, "Octopuses have three hearts.");
        assert_eq!(first.source, FACT_SOURCE);
        assert_eq!(first.permalink, "https://facts.example/1");
        assert_eq!(second, first);
        assert_eq!(cache.fact(), Some(first));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_force_new_bypasses_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/facts/random")
            .with_status(200)
            .with_body(r#"{"text":"Bananas are berries."}"#)
            .expect(2)
            .create_async()
            .await;

        let (facts, _) = service(format!("{}/facts/random", server.url()));

        facts.daily_fact(false).await;
        let forced = facts.daily_fact(true).await;

        assert_eq!(forced.text, "Bananas are berries.");
        assert_eq!(forced.permalink, "");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_200_returns_fallback_uncached() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/facts/random")
            .with_status(503)
            .create_async()
            .await;

        let (facts, cache) = service(format!("{}/facts/random", server.url()));

        let fact = facts.daily_fact(false).await;
        assert_eq!(fact.text, UNAVAILABLE_FACT);
        assert!(cache.fact().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_returns_fallback() {
        let (facts, _) = service("http://127.0.0.1:1/facts/random".to_string());

        let fact = facts.daily_fact(false).await;
        assert_eq!(fact.text, UNREACHABLE_FACT);
    }
}
