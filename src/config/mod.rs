//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, CLI/env overrides)
//!     → validation.rs (semantic checks)
//!     → SimulatorConfig (validated, immutable)
//!     → cloned into each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ChainConfig, ChainMode, ListenerConfig, MillisRange, ObservabilityConfig, SimulationConfig,
    SimulatorConfig, TelemetryConfig, TimeoutConfig,
};
