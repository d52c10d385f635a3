//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Start telemetry → Bind listener → Serve
//!
//! Shutdown:
//!     Signal received (signals.rs) → Shutdown::trigger (shutdown.rs)
//!     → Server drains in-flight requests → Telemetry flushes → Exit
//! ```
//!
//! # Design Decisions
//! - Telemetry starts before the listener and stops after it, so no request
//!   can emit into a closed sink
//! - Telemetry flush has a timeout: forced exit after deadline

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
