//! In-memory sink that keeps everything it receives.

use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;

use crate::telemetry::{EventType, SimulatedError, SyntheticEvent, TelemetrySink};

/// Sink that records events and errors for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SyntheticEvent>>,
    errors: Mutex<Vec<SimulatedError>>,
    counts: DashMap<EventType, u64>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events in emission order.
    pub fn events(&self) -> Vec<SyntheticEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded events of a single type.
    pub fn events_of(&self, event_type: EventType) -> Vec<SyntheticEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Snapshot of all noticed errors.
    pub fn errors(&self) -> Vec<SimulatedError> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, event_type: EventType) -> u64 {
        self.counts.get(&event_type).map(|c| *c).unwrap_or(0)
    }
}

impl TelemetrySink for RecordingSink {
    fn record_custom_event(&self, event: SyntheticEvent) {
        *self.counts.entry(event.event_type).or_insert(0) += 1;
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn notice_error(&self, error: &SimulatedError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error.clone());
    }
}
