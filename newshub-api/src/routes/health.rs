//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;

use newshub_core::FeedKey;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    /// Whether the global feed is currently cached
    global_feed_cached: bool,
    active_sessions: usize,
    similarity_threshold: f64,
}

/// Health check handler
///
/// Provider outages never make the service unhealthy; feeds degrade to
/// empty lists instead.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse {
        status: "healthy".to_string(),
        global_feed_cached: state.news_cache.snapshot(&FeedKey::Global).is_some(),
        active_sessions: state.sessions.len(),
        similarity_threshold: state.news_service.similarity_threshold(),
    };

    (StatusCode::OK, Json(response))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}
