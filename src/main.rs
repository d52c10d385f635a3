//! Synthetic Observability Event Simulator
//!
//! An HTTP service that fabricates observability signals (custom events,
//! latency, errors, chained calls) for exercising a monitoring platform.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                     SIMULATOR                        │
//!                      │                                                      │
//!   Client Request     │  ┌─────────┐    ┌──────────┐    ┌───────────────┐    │
//!   ───────────────────┼─▶│  http   │───▶│ handlers │───▶│   simulator   │    │
//!                      │  │ server  │    │          │    │  operations   │    │
//!                      │  └─────────┘    └──────────┘    └───┬───────┬───┘    │
//!                      │                                     │       │        │
//!                      │                   nested calls ◀────┘       ▼        │
//!                      │                 (loopback / in-process)  telemetry   │
//!                      │                                          sink ───────┼──▶ logs / metrics
//!                      │                                                      │
//!                      │  ┌────────────────────────────────────────────────┐  │
//!                      │  │ config │ observability │ lifecycle (shutdown)  │  │
//!                      │  └────────────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use observability_sim::config::{self, SimulatorConfig};
use observability_sim::lifecycle::{signals, Shutdown};
use observability_sim::observability::{logging, metrics};
use observability_sim::simulator::ThreadRandom;
use observability_sim::{HttpServer, Telemetry};

#[derive(Parser)]
#[command(name = "observability-sim")]
#[command(about = "Synthetic observability event simulator", version)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long, env = "SIMULATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener port.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => SimulatorConfig::default(),
    };
    if let Some(port) = cli.port {
        config::loader::override_port(&mut config, port);
    }

    logging::init_logging(&config.observability);
    tracing::info!("observability-sim v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        chain_mode = ?config.chain.mode,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let telemetry = Telemetry::start(&config.telemetry);
    let flush_timeout = Duration::from_millis(config.telemetry.flush_timeout_ms);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::listen(shutdown.clone()));

    let server = HttpServer::new(config, telemetry.sink(), Arc::new(ThreadRandom));
    let result = server.run(listener, shutdown.subscribe()).await;

    telemetry.shutdown(flush_timeout).await;
    result?;

    tracing::info!("Shutdown complete");
    Ok(())
}
