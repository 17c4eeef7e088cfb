//! API route definitions

mod health;
mod news;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

use axum::Router;
use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(news::routes())
        .merge(health::routes())
}
