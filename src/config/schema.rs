//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the simulator.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the simulator service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Workload shapes for the synthetic endpoints.
    pub simulation: SimulationConfig,

    /// How chain endpoints reach their nested targets.
    pub chain: ChainConfig,

    /// Telemetry sink settings.
    pub telemetry: TelemetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Connection establishment timeout for nested chain calls in seconds.
    pub chain_connect_secs: u64,

    /// Total timeout for a single nested chain call in seconds.
    pub chain_request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            chain_connect_secs: 5,
            chain_request_secs: 15,
        }
    }
}

/// Half-open millisecond range `[min_ms, max_ms)`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct MillisRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl MillisRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Width of the range in milliseconds.
    pub fn span(&self) -> u64 {
        self.max_ms.saturating_sub(self.min_ms)
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min_ms && value < self.max_ms
    }
}

/// Workload shapes for the synthetic endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Iterations of the CPU-bound loop behind `/fake-load`.
    pub load_iterations: u64,

    /// Delay window for `/simulate-apm`.
    pub apm_delay: MillisRange,

    /// Latency window for `/simulate-network`.
    pub network_latency: MillisRange,

    /// Probability that `/simulate-network` reports a failure.
    pub network_failure_rate: f64,

    /// Delay window for `/api/slow`.
    pub slow_delay: MillisRange,

    /// Upper bound applied to the `delay` query parameter of `/simulate-api`.
    /// Must stay below `timeouts.request_secs`.
    pub max_api_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            load_iterations: 10_000_000,
            apm_delay: MillisRange::new(500, 3000),
            network_latency: MillisRange::new(100, 1100),
            network_failure_rate: 0.3,
            slow_delay: MillisRange::new(3000, 6000),
            max_api_delay_ms: 25_000,
        }
    }
}

/// Transport used by chain endpoints for their nested calls.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChainMode {
    /// Real HTTP hop back into this server.
    #[default]
    Loopback,
    /// Direct function composition, no network.
    InProcess,
}

/// Chain endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ChainConfig {
    pub mode: ChainMode,

    /// Base URL for loopback calls. Defaults to `http://127.0.0.1:<bound port>`.
    pub base_url: Option<String>,
}

/// Telemetry sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Disable to drop every event and error on the floor.
    pub enabled: bool,

    /// Application name attached to every exported record.
    pub app_name: String,

    /// How long shutdown waits for queued records to drain, in milliseconds.
    pub flush_timeout_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: "Observability Demo".to_string(),
            flush_timeout_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let raw = r#"
            [listener]
            bind_address = "127.0.0.1:7000"

            [simulation]
            network_failure_rate = 0.5

            [chain]
            mode = "in_process"
        "#;
        let config: SimulatorConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:7000");
        assert_eq!(config.simulation.network_failure_rate, 0.5);
        assert_eq!(config.simulation.apm_delay, MillisRange::new(500, 3000));
        assert_eq!(config.chain.mode, ChainMode::InProcess);
        assert!(config.chain.base_url.is_none());
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_millis_range() {
        let range = MillisRange::new(100, 1100);
        assert_eq!(range.span(), 1000);
        assert!(range.contains(100));
        assert!(range.contains(1099));
        assert!(!range.contains(1100));
    }
}
