//! Caller session resolution
//!
//! Sessions are identified by the `x-session-id` header. Requests without a
//! usable id get a fresh one, echoed back in the response header.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderValue},
    response::{IntoResponse, Response},
};
use tracing::debug;

use newshub_services::{SessionHandle, SessionStore};

use crate::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

const MAX_SESSION_ID_LEN: usize = 64;

/// The caller's session, resolved from the request headers
pub struct CallerSession {
    pub id: String,
    pub handle: SessionHandle,
}

impl CallerSession {
    /// Attach the session id header to a response
    pub fn respond(&self, body: impl IntoResponse) -> Response {
        let mut response = body.into_response();
        if let Ok(value) = HeaderValue::from_str(&self.id) {
            response.headers_mut().insert(SESSION_HEADER, value);
        }
        response
    }
}

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl FromRequestParts<AppState> for CallerSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| is_valid_session_id(id))
            .map(String::from)
            .unwrap_or_else(|| {
                let id = SessionStore::new_session_id();
                debug!("Issued session id {}", id);
                id
            });

        let handle = state.sessions.session(&id);
        Ok(Self { id, handle })
    }
}
