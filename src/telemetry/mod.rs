//! Telemetry sink subsystem.
//!
//! # Data Flow
//! ```text
//! simulator operation
//!     → TelemetrySink::record_custom_event / notice_error
//!     → reporter.rs (unbounded queue, background export task)
//!     → structured log record + metrics counters
//! ```
//!
//! # Design Decisions
//! - The sink is injected into every handler as `Arc<dyn TelemetrySink>`
//! - Emission never blocks and never fails the request
//! - Lifecycle is explicit: `Telemetry::start` at boot, `Telemetry::shutdown` drains

pub mod event;
pub mod recording;
pub mod reporter;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::TelemetryConfig;

pub use event::{now_millis, AttributeValue, EventType, SimulatedError, SyntheticEvent};
pub use recording::RecordingSink;
pub use reporter::{Reporter, ReporterSink, ReporterStats};

/// Destination for custom events and error notifications.
///
/// Implementations must accept concurrent emission from many in-flight requests.
pub trait TelemetrySink: Send + Sync {
    /// Record a custom event.
    fn record_custom_event(&self, event: SyntheticEvent);

    /// Report an error through the error-notification path.
    fn notice_error(&self, error: &SimulatedError);
}

/// Sink used when telemetry is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn record_custom_event(&self, _event: SyntheticEvent) {}

    fn notice_error(&self, _error: &SimulatedError) {}
}

/// Process-wide telemetry handle owning the reporter task.
pub struct Telemetry {
    sink: Arc<dyn TelemetrySink>,
    worker: Option<JoinHandle<ReporterStats>>,
}

impl Telemetry {
    /// Start the sink described by `config`. Must be called inside a Tokio runtime.
    pub fn start(config: &TelemetryConfig) -> Self {
        if !config.enabled {
            tracing::info!("Telemetry disabled, events will be discarded");
            return Self {
                sink: Arc::new(NoopSink),
                worker: None,
            };
        }

        let (sink, reporter) = Reporter::new(config.app_name.clone());
        let worker = tokio::spawn(reporter.run());

        tracing::info!(app_name = %config.app_name, "Telemetry reporter started");
        Self {
            sink: Arc::new(sink),
            worker: Some(worker),
        }
    }

    /// Shared handle to the sink for injection into handlers.
    pub fn sink(&self) -> Arc<dyn TelemetrySink> {
        self.sink.clone()
    }

    /// Drain queued records and stop the reporter.
    ///
    /// Every other clone of the sink must already be dropped, otherwise the
    /// reporter keeps waiting until `timeout` elapses.
    pub async fn shutdown(self, timeout: Duration) -> Option<ReporterStats> {
        let Telemetry { sink, worker } = self;
        drop(sink);

        let worker = worker?;
        match tokio::time::timeout(timeout, worker).await {
            Ok(Ok(stats)) => {
                tracing::info!(
                    events = stats.events,
                    errors = stats.errors,
                    "Telemetry flushed"
                );
                Some(stats)
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Telemetry reporter task failed");
                None
            }
            Err(_) => {
                tracing::warn!(?timeout, "Telemetry flush timed out");
                None
            }
        }
    }
}
