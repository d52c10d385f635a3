//! Synthetic telemetry records.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Custom event types emitted by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventType {
    #[serde(rename = "FakeLoadEvent")]
    Load,
    #[serde(rename = "FakeAPMEvent")]
    Apm,
    #[serde(rename = "FakeInfraEvent")]
    Infra,
    #[serde(rename = "FakeBrowserEvent")]
    Browser,
    #[serde(rename = "FakeSyntheticEvent")]
    Synthetic,
    #[serde(rename = "FakeLogEvent")]
    Log,
    #[serde(rename = "FakeDistributedTracingEvent")]
    DistributedTracing,
    #[serde(rename = "FakeNetworkEvent")]
    Network,
    #[serde(rename = "FakeAPIEvent")]
    Api,
}

impl EventType {
    /// Name under which the event is recorded by the sink.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Load => "FakeLoadEvent",
            EventType::Apm => "FakeAPMEvent",
            EventType::Infra => "FakeInfraEvent",
            EventType::Browser => "FakeBrowserEvent",
            EventType::Synthetic => "FakeSyntheticEvent",
            EventType::Log => "FakeLogEvent",
            EventType::DistributedTracing => "FakeDistributedTracingEvent",
            EventType::Network => "FakeNetworkEvent",
            EventType::Api => "FakeAPIEvent",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attribute value on a custom event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl AttributeValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<u64> for AttributeValue {
    fn from(v: u64) -> Self {
        AttributeValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Str(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Str(v)
    }
}

/// A fabricated telemetry record, handed to the sink as soon as it is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticEvent {
    pub event_type: EventType,
    pub timestamp_ms: u64,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl SyntheticEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            timestamp_ms: now_millis(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute insertion.
    pub fn with(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// A deliberately raised error destined for the sink's error path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SimulatedError {
    pub message: String,
    /// Endpoint that raised the error.
    pub origin: &'static str,
}

impl SimulatedError {
    pub fn new(origin: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            origin,
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = SyntheticEvent::new(EventType::Api)
            .with("delay", 100u64)
            .with("status", "success");

        assert_eq!(event.event_type.as_str(), "FakeAPIEvent");
        assert_eq!(event.attribute("delay").and_then(|v| v.as_i64()), Some(100));
        assert_eq!(event.attribute("status").and_then(|v| v.as_str()), Some("success"));
        assert!(event.timestamp_ms > 0);
    }

    #[test]
    fn test_event_serializes_flat_attributes() {
        let event = SyntheticEvent::new(EventType::Network).with("latency", 250u64);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "FakeNetworkEvent");
        assert_eq!(json["attributes"]["latency"], 250);
    }
}
