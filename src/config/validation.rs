//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, windows non-empty, probabilities in [0, 1])
//! - Validate addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SimulatorConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use crate::config::schema::{MillisRange, SimulatorConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: range [{min_ms}, {max_ms}) is empty")]
    EmptyRange {
        field: &'static str,
        min_ms: u64,
        max_ms: u64,
    },

    #[error("{field}: probability {value} outside [0, 1]")]
    Probability { field: &'static str, value: f64 },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: {value_ms}ms does not fit within {limit_field} ({limit_ms}ms)")]
    ExceedsTimeout {
        field: &'static str,
        value_ms: u64,
        limit_field: &'static str,
        limit_ms: u64,
    },
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &SimulatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if let Some(base_url) = &config.chain.base_url {
        match url::Url::parse(base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push(ValidationError::InvalidUrl {
                field: "chain.base_url",
                value: base_url.clone(),
            }),
        }
    }

    let sim = &config.simulation;
    check_range(&mut errors, "simulation.apm_delay", sim.apm_delay);
    check_range(&mut errors, "simulation.network_latency", sim.network_latency);
    check_range(&mut errors, "simulation.slow_delay", sim.slow_delay);

    if !(0.0..=1.0).contains(&sim.network_failure_rate) {
        errors.push(ValidationError::Probability {
            field: "simulation.network_failure_rate",
            value: sim.network_failure_rate,
        });
    }

    if sim.load_iterations == 0 {
        errors.push(ValidationError::Zero {
            field: "simulation.load_iterations",
        });
    }

    for (field, value) in [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.chain_connect_secs", config.timeouts.chain_connect_secs),
        ("timeouts.chain_request_secs", config.timeouts.chain_request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    check_timing(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_range(errors: &mut Vec<ValidationError>, field: &'static str, range: MillisRange) {
    if range.min_ms >= range.max_ms {
        errors.push(ValidationError::EmptyRange {
            field,
            min_ms: range.min_ms,
            max_ms: range.max_ms,
        });
    }
}

/// Delays must finish inside the timeouts that wrap them. A zero timeout is
/// already reported on its own and skipped here.
fn check_timing(errors: &mut Vec<ValidationError>, config: &SimulatorConfig) {
    let sim = &config.simulation;
    let request_ms = config.timeouts.request_secs.saturating_mul(1000);
    let chain_ms = config.timeouts.chain_request_secs.saturating_mul(1000);

    if request_ms > 0 {
        // the applied delay can equal the cap itself
        if sim.max_api_delay_ms >= request_ms {
            errors.push(ValidationError::ExceedsTimeout {
                field: "simulation.max_api_delay_ms",
                value_ms: sim.max_api_delay_ms,
                limit_field: "timeouts.request_secs",
                limit_ms: request_ms,
            });
        }
        if sim.slow_delay.max_ms > request_ms {
            errors.push(ValidationError::ExceedsTimeout {
                field: "simulation.slow_delay",
                value_ms: sim.slow_delay.max_ms,
                limit_field: "timeouts.request_secs",
                limit_ms: request_ms,
            });
        }
    }

    let chain_window = sim.apm_delay.max_ms.saturating_add(sim.network_latency.max_ms);
    if chain_ms > 0 && chain_window > chain_ms {
        errors.push(ValidationError::ExceedsTimeout {
            field: "simulation.apm_delay + simulation.network_latency",
            value_ms: chain_window,
            limit_field: "timeouts.chain_request_secs",
            limit_ms: chain_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SimulatorConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SimulatorConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.chain.base_url = Some("ftp://example.com".into());
        config.simulation.apm_delay = MillisRange::new(3000, 500);
        config.simulation.network_failure_rate = 1.5;
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::Zero {
            field: "timeouts.request_secs"
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidUrl { .. })));
    }

    #[test]
    fn test_api_delay_cap_must_fit_request_timeout() {
        let mut config = SimulatorConfig::default();
        config.timeouts.request_secs = 30;
        config.simulation.max_api_delay_ms = 30_000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ExceedsTimeout {
                field: "simulation.max_api_delay_ms",
                value_ms: 30_000,
                limit_field: "timeouts.request_secs",
                limit_ms: 30_000,
            }]
        );

        config.simulation.max_api_delay_ms = 29_999;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_slow_window_must_fit_request_timeout() {
        let mut config = SimulatorConfig::default();
        config.timeouts.request_secs = 5;
        config.simulation.max_api_delay_ms = 1_000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ValidationError::ExceedsTimeout {
                field: "simulation.slow_delay",
                value_ms: 6_000,
                ..
            }
        ));
    }

    #[test]
    fn test_chain_window_must_fit_chain_timeout() {
        let mut config = SimulatorConfig::default();
        config.timeouts.chain_request_secs = 4;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("timeouts.chain_request_secs"));
        assert!(matches!(
            errors[0],
            ValidationError::ExceedsTimeout {
                value_ms: 4_100,
                limit_ms: 4_000,
                ..
            }
        ));

        config.timeouts.chain_request_secs = 5;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_skips_timing_checks() {
        let mut config = SimulatorConfig::default();
        config.timeouts.chain_request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::Zero {
                field: "timeouts.chain_request_secs"
            }]
        );
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = SimulatorConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
