//! Endpoint handlers.
//!
//! Thin adapters: extract inputs, call the simulator, wrap the result as JSON.
//! Simulated failures turn into 500 responses through `IntoResponse`.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::http::request::{request_id, ApiQuery};
use crate::http::server::AppState;
use crate::simulator::{
    Acknowledgement, ApiReport, ApmReport, InfraReport, LoadReport, NetworkReport,
    SimulatedFailure, SyntheticReport, TracingReport,
};

pub async fn fake_load(State(state): State<AppState>) -> Json<LoadReport> {
    Json(state.simulator.fake_load())
}

pub async fn simulate_apm(State(state): State<AppState>) -> Json<ApmReport> {
    Json(state.simulator.simulate_apm().await)
}

pub async fn simulate_infra(State(state): State<AppState>) -> Json<InfraReport> {
    Json(state.simulator.simulate_infra())
}

pub async fn browser_monitoring(State(state): State<AppState>) -> Json<Acknowledgement> {
    Json(state.simulator.browser_monitoring())
}

pub async fn simulate_synthetic(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SyntheticReport>, SimulatedFailure> {
    tracing::debug!(request_id = %request_id(&headers), "Running synthetic chain");
    state
        .simulator
        .simulate_synthetic(state.transport.as_ref(), &headers)
        .await
        .map(Json)
}

pub async fn fake_log(State(state): State<AppState>) -> Json<Acknowledgement> {
    Json(state.simulator.fake_log())
}

pub async fn simulate_tracing(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TracingReport>, SimulatedFailure> {
    tracing::debug!(request_id = %request_id(&headers), "Running tracing chain");
    state
        .simulator
        .simulate_tracing(state.transport.as_ref(), &headers)
        .await
        .map(Json)
}

pub async fn simulate_network(
    State(state): State<AppState>,
) -> Result<Json<NetworkReport>, SimulatedFailure> {
    state.simulator.simulate_network().await.map(Json)
}

pub async fn simulate_api(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<ApiReport>, SimulatedFailure> {
    state.simulator.simulate_api(query.params()).await.map(Json)
}

// Probe endpoints. These bypass the telemetry sink.

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn api_normal() -> Json<Value> {
    tracing::info!("Normal endpoint hit");
    Json(json!({ "status": "ok", "message": "Normal response" }))
}

pub async fn api_slow(State(state): State<AppState>) -> Json<Value> {
    let delay = state.simulator.simulate_slow().await;
    Json(json!({
        "status": "ok",
        "message": format!("Delayed response ({delay}ms)"),
    }))
}

pub async fn api_error() -> impl IntoResponse {
    tracing::error!("Error endpoint triggered");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "message": "Simulated server error" })),
    )
}

pub async fn api_synthetic() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Synthetic monitoring test response" }))
}
