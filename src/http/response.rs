//! Response handling.
//!
//! # Responsibilities
//! - Map simulated failures to their 500 JSON bodies
//! - JSON fallback for unknown routes

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::simulator::SimulatedFailure;

impl IntoResponse for SimulatedFailure {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.body())).into_response()
    }
}

/// Fallback for routes the simulator does not serve.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "error", "message": "Not found" })),
    )
        .into_response()
}
