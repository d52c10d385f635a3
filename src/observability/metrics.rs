//! Metrics collection and exposition.
//!
//! # Metrics
//! - `simulator_http_requests_total` (counter): requests by method, route, status
//! - `simulator_http_request_duration_seconds` (histogram): latency distribution
//! - `simulator_custom_events_total` (counter): exported custom events by type
//! - `simulator_errors_total` (counter): noticed simulated errors by origin
//!
//! Recording is a no-op until a recorder is installed, so tests never need one.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "simulator_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "simulator_http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record an exported custom event.
pub fn record_custom_event(event_type: &'static str) {
    metrics::counter!("simulator_custom_events_total", "event_type" => event_type).increment(1);
}

/// Record a noticed simulated error.
pub fn record_simulated_error(origin: &'static str) {
    metrics::counter!("simulator_errors_total", "origin" => origin).increment(1);
}
