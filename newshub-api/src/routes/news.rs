//! News-related API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use newshub_core::{Article, Category, DailyFact, FeedKey, Locality};

use super::session::CallerSession;
use crate::AppState;

/// Upper bound on a "load more" page
const MAX_PAGE_SIZE: usize = 50;

fn category_names() -> Vec<&'static str> {
    Category::ALL.iter().map(|c| c.as_str()).collect()
}

/// Create news routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/news", get(get_front_page))
        .route("/category/{name}", get(get_category))
        .route("/search", get(search_news))
        .route("/local", get(get_local))
        .route("/more", get(load_more))
        .route("/fact/random", get(random_fact))
}

#[derive(Debug, Serialize)]
struct FrontPageResponse {
    global: Vec<Article>,
    indian: Vec<Article>,
    daily_fact: DailyFact,
    categories: Vec<&'static str>,
}

/// GET /api/news - Global and India headlines with the daily fact
async fn get_front_page(State(state): State<AppState>, session: CallerSession) -> Response {
    let front = {
        let mut guard = session.handle.lock().await;
        state.tracker.open_front_page(&mut guard).await
    };
    let daily_fact = state.facts_service.daily_fact(false).await;

    session.respond(Json(FrontPageResponse {
        global: front.global,
        indian: front.indian,
        daily_fact,
        categories: category_names(),
    }))
}

#[derive(Debug, Serialize)]
struct CategoryResponse {
    category: &'static str,
    articles: Vec<Article>,
    has_more: bool,
}

/// GET /api/category/{name} - Headlines for one category
async fn get_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
    session: CallerSession,
) -> Response {
    let category: Category = match name.parse() {
        Ok(category) => category,
        Err(e) => {
            debug!("Rejected category request: {}", e);
            return session.respond((
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "error": "Invalid category. Please choose from the available categories.",
                    "categories": category_names(),
                })),
            ));
        }
    };

    let snapshot = {
        let mut guard = session.handle.lock().await;
        state
            .tracker
            .open_feed(&FeedKey::Category(category), &mut guard)
            .await
    };

    session.respond(Json(CategoryResponse {
        category: category.as_str(),
        articles: snapshot.articles.clone(),
        has_more: snapshot.next_token.is_some(),
    }))
}

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    query: String,
    articles: Vec<Article>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_query: Option<String>,
    has_more: bool,
}

/// GET /api/search?q= - Search all news
async fn search_news(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
    session: CallerSession,
) -> Response {
    let query = params.q.unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return session.respond(Json(SearchResponse {
            query,
            articles: Vec::new(),
            suggested_query: None,
            has_more: false,
        }));
    }

    info!("Search request: {}", query);
    let page = {
        let mut guard = session.handle.lock().await;
        state.tracker.search(&query, &mut guard).await
    };

    session.respond(Json(SearchResponse {
        query,
        has_more: page.next_token.is_some(),
        articles: page.articles,
        suggested_query: page.suggested_query,
    }))
}

/// Query parameters for local news
#[derive(Debug, Deserialize)]
pub struct LocalQuery {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
struct LocalResponse {
    /// Feed key to pass to `/api/more`
    feed: String,
    articles: Vec<Article>,
    has_more: bool,
}

/// GET /api/local?country=&state=&city= - Headlines for a place
async fn get_local(
    State(state): State<AppState>,
    Query(params): Query<LocalQuery>,
    session: CallerSession,
) -> Response {
    let locality = match Locality::new(
        params.country.as_deref().unwrap_or_default(),
        params.state.as_deref(),
        params.city.as_deref(),
    ) {
        Ok(locality) => locality,
        Err(e) => {
            debug!("Rejected local news request: {}", e);
            return session.respond((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "A country code is required for local news." })),
            ));
        }
    };

    let feed = FeedKey::Local(locality);
    let snapshot = {
        let mut guard = session.handle.lock().await;
        state.tracker.open_feed(&feed, &mut guard).await
    };

    session.respond(Json(LocalResponse {
        feed: feed.to_string(),
        articles: snapshot.articles.clone(),
        has_more: snapshot.next_token.is_some(),
    }))
}

/// Query parameters for loading more articles
#[derive(Debug, Deserialize)]
pub struct MoreQuery {
    /// Feed key such as `global` or `category:science`
    #[serde(default)]
    pub feed: Option<String>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

/// GET /api/more?feed=&page_size= - Next unseen articles of a feed
async fn load_more(
    State(state): State<AppState>,
    Query(params): Query<MoreQuery>,
    session: CallerSession,
) -> Response {
    let feed: FeedKey = match params.feed.as_deref().unwrap_or_default().parse() {
        Ok(feed) => feed,
        Err(e) => {
            return session.respond((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            ));
        }
    };

    let page_size = params
        .page_size
        .unwrap_or(state.tracker.config().default_page_size)
        .clamp(1, MAX_PAGE_SIZE);

    let more = {
        let mut guard = session.handle.lock().await;
        state.tracker.get_more(&feed, &mut guard, page_size).await
    };

    session.respond(Json(more))
}

/// GET /api/fact/random - A new fact, bypassing the cache
async fn random_fact(State(state): State<AppState>) -> Json<DailyFact> {
    Json(state.facts_service.daily_fact(true).await)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get, ids, json_body, page, test_app};
    use axum::http::StatusCode;
    use newshub_news::RawPage;

    #[tokio::test]
    async fn test_front_page_issues_session() {
        let (app, _) = test_app(vec![
            page(&["g1", "g2", "g3"], Some("gt")),
            page(&["i1", "i2"], Some("it")),
        ]);

        let response = get(&app, "/api/news", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let session = response.headers().get("x-session-id").cloned();
        assert!(session.is_some());

        let body = json_body(response).await;
        assert_eq!(ids(&body["global"]), vec!["g1", "g2"]);
        assert_eq!(ids(&body["indian"]), vec!["i1", "i2"]);
        assert_eq!(body["daily_fact"]["source"], "NewsHub");
        assert_eq!(body["categories"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_front_page_is_served_from_cache() {
        let (app, source) = test_app(vec![page(&["g1"], None), page(&["i1"], None)]);

        get(&app, "/api/news", Some("a")).await;
        let response = get(&app, "/api/news", Some("b")).await;

        assert_eq!(response.headers()["x-session-id"], "b");
        let body = json_body(response).await;
        assert_eq!(ids(&body["global"]), vec!["g1"]);
        assert_eq!(source.queries.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_category_is_404() {
        let (app, source) = test_app(Vec::new());

        let response = get(&app, "/api/category/astrology", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert!(body["categories"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c == "technology"));
        assert!(source.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_category_then_load_more_skips_seen() {
        let (app, source) = test_app(vec![
            page(&["t1", "t2"], Some("p2")),
            page(&["t2", "t3"], None),
        ]);

        let response = get(&app, "/api/category/Technology", Some("reader-1")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["category"], "technology");
        assert_eq!(ids(&body["articles"]), vec!["t1", "t2"]);
        assert_eq!(body["has_more"], true);

        let response = get(&app, "/api/more?feed=category:technology", Some("reader-1")).await;
        let body = json_body(response).await;
        assert_eq!(ids(&body["articles"]), vec!["t3"]);
        assert_eq!(body["has_more"], false);

        // exhausted: no further provider call
        let response = get(&app, "/api/more?feed=category:technology", Some("reader-1")).await;
        let body = json_body(response).await;
        assert!(body["articles"].as_array().unwrap().is_empty());
        assert_eq!(source.queries.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_feed_key_is_400() {
        let (app, _) = test_app(Vec::new());

        let response = get(&app, "/api/more?feed=sideways", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = get(&app, "/api/more", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_search_returns_empty_list() {
        let (app, source) = test_app(Vec::new());

        let response = get(&app, "/api/search?q=", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["articles"].as_array().unwrap().is_empty());
        assert!(source.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_reports_suggestion() {
        let mut results = page(&["s1"], Some("n2"));
        results.suggested_query = Some("monsoon".to_string());
        let (app, _) = test_app(vec![results]);

        let response = get(&app, "/api/search?q=monson", None).await;
        let body = json_body(response).await;
        assert_eq!(body["query"], "monson");
        assert_eq!(body["suggested_query"], "monsoon");
        assert_eq!(body["has_more"], true);
        assert_eq!(ids(&body["articles"]), vec!["s1"]);
    }

    #[tokio::test]
    async fn test_provider_failure_is_empty_not_5xx() {
        let (app, _) = test_app(vec![RawPage::empty()]);

        let response = get(&app, "/api/category/science", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["articles"].as_array().unwrap().is_empty());
        assert_eq!(body["has_more"], false);
    }

    #[tokio::test]
    async fn test_local_news_then_load_more() {
        let (app, source) = test_app(vec![
            page(&["l1", "l2"], Some("lt")),
            page(&["l2", "l3"], None),
        ]);

        let response = get(
            &app,
            "/api/local?country=IN&state=Goa&city=Panaji",
            Some("reader-2"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["feed"], "local:in/Goa/Panaji");
        assert_eq!(ids(&body["articles"]), vec!["l1", "l2"]);
        assert_eq!(body["has_more"], true);

        let response = get(&app, "/api/more?feed=local:in/Goa/Panaji", Some("reader-2")).await;
        let body = json_body(response).await;
        assert_eq!(ids(&body["articles"]), vec!["l3"]);

        let queries = source.queries.lock().unwrap();
        assert_eq!(queries[0].country.as_deref(), Some("in"));
        assert_eq!(queries[0].q.as_deref(), Some("Goa OR Panaji"));
        assert_eq!(queries[1].page.as_deref(), Some("lt"));
    }

    #[tokio::test]
    async fn test_local_news_requires_country() {
        let (app, source) = test_app(Vec::new());

        let response = get(&app, "/api/local?city=Pune", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(source.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_random_fact_falls_back() {
        let (app, _) = test_app(Vec::new());

        let response = get(&app, "/api/fact/random", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["text"].as_str().unwrap().starts_with("Did you know?"));
    }
}
