//! Router test helpers

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use newshub_news::{ArticleSource, ProviderQuery, RawArticle, RawPage};
use newshub_services::{
    FactsConfig, FactsService, NewsCache, NewsService, NewsServiceConfig, PaginationConfig,
    PaginationTracker, SessionStore,
};

use crate::{app, AppState};

/// Serves queued pages in order, then empty pages
pub struct QueuedSource {
    pages: Mutex<VecDeque<RawPage>>,
    pub queries: Mutex<Vec<ProviderQuery>>,
}

#[async_trait]
impl ArticleSource for QueuedSource {
    async fn fetch_page(&self, query: &ProviderQuery) -> RawPage {
        self.queries.lock().unwrap().push(query.clone());
        self.pages.lock().unwrap().pop_front().unwrap_or_default()
    }
}

/// A page of unrelated articles with the given ids
pub fn page(ids: &[&str], next: Option<&str>) -> RawPage {
    const SUBJECTS: &[&str] = &[
        "harbor", "violin", "glacier", "orchard", "satellite", "bakery", "volcano", "library",
    ];
    RawPage {
        results: ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let subject = SUBJECTS[i % SUBJECTS.len()];
                RawArticle {
                    article_id: Some(id.to_string()),
                    title: Some(format!("{} {}", subject, id)),
                    description: Some(format!("story about {} number {}", subject, id)),
                    link: Some(format!("https://news.example/{}", id)),
                    ..RawArticle::default()
                }
            })
            .collect(),
        next_page: next.map(String::from),
        suggested_query: None,
    }
}

/// Application wired to a queued provider and an unreachable facts API
pub fn test_app(pages: Vec<RawPage>) -> (Router, Arc<QueuedSource>) {
    let source = Arc::new(QueuedSource {
        pages: Mutex::new(pages.into()),
        queries: Mutex::new(Vec::new()),
    });

    let news_service =
        Arc::new(NewsService::new(source.clone(), NewsServiceConfig::default()).unwrap());
    let news_cache = Arc::new(NewsCache::new());
    let tracker = Arc::new(PaginationTracker::new(
        news_service.clone(),
        news_cache.clone(),
        PaginationConfig::default(),
    ));
    let facts_service = Arc::new(
        FactsService::new(
            news_cache.clone(),
            FactsConfig {
                url: "http://127.0.0.1:1/facts/random".to_string(),
                ..FactsConfig::default()
            },
        )
        .unwrap(),
    );

    let state = AppState {
        news_service,
        news_cache,
        tracker,
        sessions: Arc::new(SessionStore::new(Duration::from_secs(60))),
        facts_service,
    };
    (app(state), source)
}

/// Send a GET request, optionally with a session id
pub async fn get(app: &Router, uri: &str, session: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(id) = session {
        request = request.header("x-session-id", id);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Ids of the articles in a JSON array
pub fn ids(articles: &Value) -> Vec<String> {
    articles
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap().to_string())
        .collect()
}
