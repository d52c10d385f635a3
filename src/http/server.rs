//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all simulator and probe handlers
//! - Wire up middleware (timeout, request ID, tracing, CORS, metrics)
//! - Build the chain transport selected by config
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ChainMode, SimulatorConfig};
use crate::http::handlers;
use crate::http::middleware::track_metrics;
use crate::http::response::not_found;
use crate::lifecycle::shutdown;
use crate::simulator::{
    endpoints, ChainError, ChainTransport, InProcessTransport, LoopbackTransport, RandomSource,
    Simulator,
};
use crate::telemetry::TelemetrySink;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub simulator: Simulator,
    pub transport: Arc<dyn ChainTransport>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chain transport: {0}")]
    Chain(#[from] ChainError),

    #[error("loopback chain mode needs chain.base_url or a bound listener address")]
    NoLoopbackTarget,
}

/// HTTP server for the simulator.
pub struct HttpServer {
    config: SimulatorConfig,
    simulator: Simulator,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and collaborators.
    pub fn new(
        config: SimulatorConfig,
        sink: Arc<dyn TelemetrySink>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let simulator = Simulator::new(config.simulation.clone(), sink, random);
        Self { config, simulator }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// Build the router. `local_addr` is the bound address used as the
    /// loopback target when `chain.base_url` is unset.
    pub fn router(&self, local_addr: Option<SocketAddr>) -> Result<Router, ServerError> {
        let state = AppState {
            simulator: self.simulator.clone(),
            transport: self.build_transport(local_addr)?,
        };
        Ok(Self::build_router(&self.config, state))
    }

    fn build_transport(
        &self,
        local_addr: Option<SocketAddr>,
    ) -> Result<Arc<dyn ChainTransport>, ServerError> {
        match self.config.chain.mode {
            ChainMode::InProcess => Ok(Arc::new(InProcessTransport::new(self.simulator.clone()))),
            ChainMode::Loopback => {
                let base_url = match (&self.config.chain.base_url, local_addr) {
                    (Some(url), _) => url.clone(),
                    (None, Some(addr)) => loopback_url(addr),
                    (None, None) => return Err(ServerError::NoLoopbackTarget),
                };
                let transport = LoopbackTransport::new(
                    &base_url,
                    Duration::from_secs(self.config.timeouts.chain_connect_secs),
                    Duration::from_secs(self.config.timeouts.chain_request_secs),
                )?;
                tracing::info!(base_url = %transport.base_url(), "Chain calls use loopback HTTP");
                Ok(Arc::new(transport))
            }
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &SimulatorConfig, state: AppState) -> Router {
        Router::new()
            .route(endpoints::FAKE_LOAD, get(handlers::fake_load))
            .route(endpoints::SIMULATE_APM, get(handlers::simulate_apm))
            .route(endpoints::SIMULATE_INFRA, get(handlers::simulate_infra))
            .route(endpoints::BROWSER_MONITORING, get(handlers::browser_monitoring))
            .route(endpoints::SIMULATE_SYNTHETIC, get(handlers::simulate_synthetic))
            .route(endpoints::FAKE_LOG, get(handlers::fake_log))
            .route(endpoints::SIMULATE_TRACING, get(handlers::simulate_tracing))
            .route(endpoints::SIMULATE_NETWORK, get(handlers::simulate_network))
            .route(endpoints::SIMULATE_API, get(handlers::simulate_api))
            .route("/health", get(handlers::health))
            .route("/api/normal", get(handlers::api_normal))
            .route("/api/slow", get(handlers::api_slow))
            .route("/api/error", get(handlers::api_error))
            .route("/api/synthetic", get(handlers::api_synthetic))
            .route_layer(middleware::from_fn(track_metrics))
            .fallback(not_found)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(CorsLayer::permissive())
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        Duration::from_secs(config.timeouts.request_secs),
                    )),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let router = self.router(Some(addr))?;

        tracing::info!(
            address = %addr,
            chain_mode = ?self.config.chain.mode,
            "HTTP server starting"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown::wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `http://<addr>`, swapping an unspecified bind IP for loopback.
fn loopback_url(addr: SocketAddr) -> String {
    let mut addr = addr;
    if addr.ip().is_unspecified() {
        addr.set_ip(match addr {
            SocketAddr::V4(_) => std::net::Ipv4Addr::LOCALHOST.into(),
            SocketAddr::V6(_) => std::net::Ipv6Addr::LOCALHOST.into(),
        });
    }
    format!("http://{addr}")
}
