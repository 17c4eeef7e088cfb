//! NewsHub API Server
//!
//! HTTP API serving deduplicated, paginated news feeds from NewsData.io.

mod routes;

use axum::{
    http::{header, HeaderName, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use newshub_news::{NewsDataClient, NewsDataConfig};
use newshub_services::{
    FactsConfig, FactsService, FeedRefresher, NewsCache, NewsService, PaginationTracker,
    ServicesConfig, SessionStore,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use routes::session::SESSION_HEADER;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub news_service: Arc<NewsService>,
    pub news_cache: Arc<NewsCache>,
    pub tracker: Arc<PaginationTracker>,
    pub sessions: Arc<SessionStore>,
    pub facts_service: Arc<FactsService>,
}

/// Build the HTTP application
pub fn app(state: AppState) -> Router {
    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(SESSION_HEADER)])
        .expose_headers([HeaderName::from_static(SESSION_HEADER)]);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,newshub_api=debug")),
        )
        .init();

    info!("Starting NewsHub API");

    let provider_config = NewsDataConfig::from_env()?;
    if provider_config.api_key.is_none() {
        warn!("NEWSDATA_API_KEY not set - only the fallback key will be used");
    }
    if provider_config.fallback_api_key.is_some() {
        info!("Fallback NewsData API key configured");
    }
    let services_config = ServicesConfig::from_env()?;

    // Initialize provider client and services
    let client = Arc::new(NewsDataClient::new(provider_config)?);
    let news_service = Arc::new(NewsService::new(client, services_config.news.clone())?);
    let news_cache = Arc::new(NewsCache::new());
    let tracker = Arc::new(PaginationTracker::new(
        news_service.clone(),
        news_cache.clone(),
        services_config.pagination.clone(),
    ));
    let sessions = Arc::new(SessionStore::new(Duration::from_secs(
        services_config.session_ttl_secs,
    )));
    let facts_service = Arc::new(FactsService::new(
        news_cache.clone(),
        FactsConfig::default(),
    )?);

    // Start background feed refresher
    let refresher = Arc::new(FeedRefresher::new(
        news_service.clone(),
        news_cache.clone(),
        facts_service.clone(),
        sessions.clone(),
        services_config.refresher.clone(),
    ));
    refresher.start().await;

    // Create app state
    let state = AppState {
        news_service,
        news_cache,
        tracker,
        sessions,
        facts_service,
    };

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
