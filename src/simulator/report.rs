//! Success payloads returned by the simulator endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadReport {
    pub message: String,
    pub duration: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApmReport {
    pub message: String,
    pub delay: u64,
}

/// Infra metrics are string-encoded decimals (`"42.17"`, `"731"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfraReport {
    pub message: String,
    pub cpu_usage: String,
    pub memory_usage: String,
    #[serde(rename = "diskIO")]
    pub disk_io: String,
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Acknowledgement {
    pub message: String,
}

impl Acknowledgement {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Combined result of the synthetic chain; nested bodies pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntheticReport {
    pub message: String,
    pub apm: Value,
    pub network: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TracingReport {
    pub message: String,
    pub apm: Value,
    pub infra: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkReport {
    pub message: String,
    pub latency: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiReport {
    pub message: String,
    pub delay: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infra_field_names() {
        let report = InfraReport {
            message: "Infrastructure simulated".into(),
            cpu_usage: "12.50".into(),
            memory_usage: "99.01".into(),
            disk_io: "731".into(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cpuUsage"], "12.50");
        assert_eq!(json["memoryUsage"], "99.01");
        assert_eq!(json["diskIO"], "731");
    }
}
