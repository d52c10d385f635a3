//! Background exporter for telemetry records.
//!
//! Handlers push records onto an unbounded queue; a single task exports them
//! as structured log records and metrics. The task ends once every sender is
//! dropped and the queue is empty.

use tokio::sync::mpsc;

use crate::observability::metrics;
use crate::telemetry::{SimulatedError, SyntheticEvent, TelemetrySink};

enum Record {
    Event(SyntheticEvent),
    Error(SimulatedError),
}

/// Counts of exported records, returned when the reporter stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReporterStats {
    pub events: u64,
    pub errors: u64,
}

/// Cloneable sending half handed to handlers.
#[derive(Clone)]
pub struct ReporterSink {
    tx: mpsc::UnboundedSender<Record>,
}

impl TelemetrySink for ReporterSink {
    fn record_custom_event(&self, event: SyntheticEvent) {
        if self.tx.send(Record::Event(event)).is_err() {
            tracing::warn!("Telemetry reporter closed, dropping custom event");
        }
    }

    fn notice_error(&self, error: &SimulatedError) {
        if self.tx.send(Record::Error(error.clone())).is_err() {
            tracing::warn!("Telemetry reporter closed, dropping error notification");
        }
    }
}

/// Receiving half; run it on its own task.
pub struct Reporter {
    app_name: String,
    rx: mpsc::UnboundedReceiver<Record>,
    stats: ReporterStats,
}

impl Reporter {
    pub fn new(app_name: String) -> (ReporterSink, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ReporterSink { tx },
            Self {
                app_name,
                rx,
                stats: ReporterStats::default(),
            },
        )
    }

    /// Export records until all senders are gone.
    pub async fn run(mut self) -> ReporterStats {
        while let Some(record) = self.rx.recv().await {
            self.export(record);
        }
        tracing::debug!(
            events = self.stats.events,
            errors = self.stats.errors,
            "Telemetry reporter stopped"
        );
        self.stats
    }

    fn export(&mut self, record: Record) {
        match record {
            Record::Event(event) => {
                let attributes =
                    serde_json::to_string(&event.attributes).unwrap_or_else(|_| "{}".to_string());
                tracing::info!(
                    target: "telemetry",
                    app = %self.app_name,
                    event_type = %event.event_type,
                    timestamp_ms = event.timestamp_ms,
                    attributes = %attributes,
                    "Custom event recorded"
                );
                metrics::record_custom_event(event.event_type.as_str());
                self.stats.events += 1;
            }
            Record::Error(error) => {
                tracing::error!(
                    target: "telemetry",
                    app = %self.app_name,
                    origin = error.origin,
                    error = %error.message,
                    "Error noticed"
                );
                metrics::record_simulated_error(error.origin);
                self.stats.errors += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::EventType;

    #[tokio::test]
    async fn test_concurrent_emission() {
        let (sink, reporter) = Reporter::new("test".into());
        let worker = tokio::spawn(reporter.run());

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let sink = sink.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..10 {
                    sink.record_custom_event(SyntheticEvent::new(EventType::Infra));
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        drop(sink);

        let stats = worker.await.unwrap();
        assert_eq!(stats.events, 100);
        assert_eq!(stats.errors, 0);
    }

    #[tokio::test]
    async fn test_send_after_close_is_dropped() {
        let (sink, reporter) = Reporter::new("test".into());
        drop(reporter);
        // must not panic
        sink.notice_error(&SimulatedError::new("test", "late"));
    }
}
