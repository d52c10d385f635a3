//! Deliberately injected failures.
//!
//! `SimulatedFailure` is the only failure kind on the request path. It is
//! always reported to the telemetry sink before it becomes a 500 response.

use serde_json::{json, Value};

use crate::simulator::chain::ChainError;
use crate::simulator::endpoints;
use crate::telemetry::SimulatedError;

/// Which chain endpoint failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    Synthetic,
    Tracing,
}

impl ChainKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ChainKind::Synthetic => endpoints::SIMULATE_SYNTHETIC,
            ChainKind::Tracing => endpoints::SIMULATE_TRACING,
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            ChainKind::Synthetic => "Error during synthetic monitoring simulation",
            ChainKind::Tracing => "Error in distributed tracing simulation",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SimulatedFailure {
    #[error("Simulated network error")]
    Network { latency: u64 },

    #[error("Simulated API error")]
    Api { delay: u64 },

    /// A nested call failed; the chain stopped at that call.
    #[error("{source}")]
    Chain {
        chain: ChainKind,
        #[source]
        source: ChainError,
    },
}

impl SimulatedFailure {
    /// Endpoint that produced the failure.
    pub fn origin(&self) -> &'static str {
        match self {
            SimulatedFailure::Network { .. } => endpoints::SIMULATE_NETWORK,
            SimulatedFailure::Api { .. } => endpoints::SIMULATE_API,
            SimulatedFailure::Chain { chain, .. } => chain.endpoint(),
        }
    }

    /// The value handed to the sink's error path.
    pub fn to_error(&self) -> SimulatedError {
        SimulatedError::new(self.origin(), self.to_string())
    }

    /// JSON body of the 500 response.
    pub fn body(&self) -> Value {
        match self {
            SimulatedFailure::Network { latency } => json!({
                "message": "Simulated network failure",
                "latency": latency,
            }),
            SimulatedFailure::Api { delay } => json!({
                "message": "Simulated API error",
                "delay": delay,
            }),
            SimulatedFailure::Chain { chain, source } => json!({
                "message": chain.failure_message(),
                "error": source.to_string(),
            }),
        }
    }
}
