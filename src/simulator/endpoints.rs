//! Route paths of the simulator endpoints.
//!
//! Shared by the router and the chain transports so both agree on targets.

pub const FAKE_LOAD: &str = "/fake-load";
pub const SIMULATE_APM: &str = "/simulate-apm";
pub const SIMULATE_INFRA: &str = "/simulate-infra";
pub const BROWSER_MONITORING: &str = "/browser-monitoring";
pub const SIMULATE_SYNTHETIC: &str = "/simulate-synthetic";
pub const FAKE_LOG: &str = "/fake-log";
pub const SIMULATE_TRACING: &str = "/simulate-tracing";
pub const SIMULATE_NETWORK: &str = "/simulate-network";
pub const SIMULATE_API: &str = "/simulate-api";

/// Every simulator path, in declaration order.
pub const ALL: [&str; 9] = [
    FAKE_LOAD,
    SIMULATE_APM,
    SIMULATE_INFRA,
    BROWSER_MONITORING,
    SIMULATE_SYNTHETIC,
    FAKE_LOG,
    SIMULATE_TRACING,
    SIMULATE_NETWORK,
    SIMULATE_API,
];
