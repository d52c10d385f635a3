//! Synthetic observability event simulator.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod simulator;
pub mod telemetry;

pub use config::SimulatorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use simulator::Simulator;
pub use telemetry::{Telemetry, TelemetrySink};
