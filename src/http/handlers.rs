//! HTTP request handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use tokio::time::Instant;

use crate::engine::{DisplayStatus, StatusCache};

/// Floor for the Cache-Control max-age, so a display whose next update is
/// overdue still gets a sane polling window instead of zero
const MINIMUM_WAITING_TIME: u64 = 10;

const DISPLAY_ID_HEADER: &str = "x-display-id";

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct AppState {
    cache: StatusCache,
    tokens: Arc<HashMap<String, String>>,
}

impl AppState {
    pub fn new(cache: StatusCache, tokens: HashMap<String, String>) -> Self {
        Self { cache, tokens: Arc::new(tokens) }
    }
}

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "epaperd"
    }))
}

/// Conditional-GET handler for the current display content.
///
/// The requesting device identifies itself with the `X-Display-ID` token
/// header and may echo back the `ETag` it holds. Unknown tokens and
/// displays without a published status are both a plain 404; source
/// failures never show up here (the last good status keeps being served).
pub async fn get_content(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = headers
        .get(DISPLAY_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    let Some(display_id) = token.and_then(|token| state.tokens.get(token)) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let Some(status) = state.cache.read(display_id).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    // rounded, not truncated: 39.6s of freshness left means max-age=40
    let max_age = (status
        .next_update
        .saturating_duration_since(Instant::now())
        .as_secs_f64()
        .round() as u64)
        .max(MINIMUM_WAITING_TIME);
    let Some(caching_headers) = caching_headers(&status, max_age) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    // 304 if the client already holds the current version
    let client_version = headers.get(header::ETAG).and_then(|value| value.to_str().ok());
    if client_version == Some(status.version.as_str()) {
        return (StatusCode::NOT_MODIFIED, caching_headers).into_response();
    }

    let mut response_headers = caching_headers;
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&status.artifact.content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    (StatusCode::OK, response_headers, status.artifact.bytes.clone()).into_response()
}

/// ETag + Cache-Control pair shared by 200 and 304 responses.
///
/// Version tokens are plain alphanumeric so the conversion cannot fail in
/// practice; a None maps to 404 rather than panicking in the handler.
fn caching_headers(status: &DisplayStatus, max_age: u64) -> Option<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ETAG, HeaderValue::from_str(&status.version).ok()?);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_str(&format!("max-age={}", max_age)).ok()?,
    );
    Some(headers)
}
