//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → trace_context.rs (W3C traceparent for chained calls)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//!     → Downstream services via propagated trace headers
//! ```

pub mod logging;
pub mod metrics;
pub mod trace_context;

pub use trace_context::TraceContext;
