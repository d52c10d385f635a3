//! Request handling helpers.
//!
//! # Responsibilities
//! - Name the request ID header used by the request-id layers
//! - Extract the raw `/simulate-api` query without rejecting odd values

use axum::http::HeaderMap;
use serde::Deserialize;

use crate::simulator::ApiParams;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID set by the request-id layer, or `"unknown"` outside it.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Raw `/simulate-api` query. Values stay strings so malformed input falls
/// back to defaults instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub struct ApiQuery {
    pub delay: Option<String>,
    pub error: Option<String>,
}

impl ApiQuery {
    pub fn params(&self) -> ApiParams {
        ApiParams::parse(self.delay.as_deref(), self.error.as_deref())
    }
}
