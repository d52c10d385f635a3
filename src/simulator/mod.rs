//! Synthetic observability event simulator.
//!
//! # Responsibilities
//! - Run the bounded synthetic workload behind each endpoint (CPU spin, delay,
//!   random metrics, chained calls)
//! - Emit one custom event per successful operation to the telemetry sink
//! - Report every injected failure through the sink's error path
//!
//! # Design Decisions
//! - Stateless: the only inputs are the injected `RandomSource`, the
//!   `SimulationConfig` and, for chains, the `ChainTransport`
//! - Delays use `tokio::time::sleep` so one request never stalls another
//! - The CPU loop runs inline on purpose; it is the load being simulated
//! - Chain calls are strictly sequential and stop at the first failure

pub mod chain;
pub mod endpoints;
pub mod failure;
pub mod random;
pub mod report;
pub mod workload;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderName};
use serde_json::Value;

use crate::config::SimulationConfig;
use crate::observability::trace_context::{TraceContext, TRACESTATE};
use crate::telemetry::{now_millis, EventType, SimulatedError, SyntheticEvent, TelemetrySink};

pub use chain::{ChainError, ChainTransport, InProcessTransport, LoopbackTransport};
pub use failure::{ChainKind, SimulatedFailure};
pub use random::{FixedRandom, RandomSource, ScriptedRandom, ThreadRandom};
pub use report::{
    Acknowledgement, ApiReport, ApmReport, InfraReport, LoadReport, NetworkReport,
    SyntheticReport, TracingReport,
};

use self::random::uniform_millis;
use self::workload::burn_cpu;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Parsed `/simulate-api` query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiParams {
    pub delay: u64,
    pub error: bool,
}

impl ApiParams {
    /// Lenient parsing: a leading integer is taken from `delay` (anything else
    /// or a negative value means 0) and only the literal `"true"` sets `error`.
    pub fn parse(delay: Option<&str>, error: Option<&str>) -> Self {
        Self {
            delay: delay.map(parse_leading_int).unwrap_or(0),
            error: error == Some("true"),
        }
    }
}

fn parse_leading_int(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

/// The simulator operations, cheap to clone and share across handlers.
#[derive(Clone)]
pub struct Simulator {
    settings: Arc<SimulationConfig>,
    sink: Arc<dyn TelemetrySink>,
    random: Arc<dyn RandomSource>,
}

impl Simulator {
    pub fn new(
        settings: SimulationConfig,
        sink: Arc<dyn TelemetrySink>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            sink,
            random,
        }
    }

    pub fn settings(&self) -> &SimulationConfig {
        &self.settings
    }

    /// CPU-bound loop over the configured iteration count.
    pub fn fake_load(&self) -> LoadReport {
        let iterations = self.settings.load_iterations;
        tracing::info!(iterations, "Starting CPU load simulation");

        let burn = burn_cpu(iterations);
        let duration = burn.duration_ms();
        self.sink.record_custom_event(
            SyntheticEvent::new(EventType::Load)
                .with("duration", duration)
                .with("iterations", burn.iterations),
        );

        tracing::info!(duration_ms = duration, total = burn.total, "Completed CPU load simulation");
        LoadReport {
            message: "Fake load generated".to_string(),
            duration,
        }
    }

    /// Sleep for a random delay in the APM window.
    pub async fn simulate_apm(&self) -> ApmReport {
        let delay = uniform_millis(self.random.as_ref(), self.settings.apm_delay);
        sleep_ms(delay).await;

        self.sink
            .record_custom_event(SyntheticEvent::new(EventType::Apm).with("delay", delay));
        tracing::info!(delay_ms = delay, "APM simulation complete");
        ApmReport {
            message: "APM simulated endpoint".to_string(),
            delay,
        }
    }

    /// Three independent draws for CPU %, memory % and disk I/O.
    pub fn simulate_infra(&self) -> InfraReport {
        let cpu = self.random.next_f64() * 100.0;
        let memory = self.random.next_f64() * 100.0;
        let disk = (self.random.next_f64() * 1000.0).floor().min(999.0);

        let cpu_usage = format!("{cpu:.2}");
        let memory_usage = format!("{memory:.2}");
        let disk_io = format!("{disk:.0}");

        self.sink.record_custom_event(
            SyntheticEvent::new(EventType::Infra)
                .with("cpuUsage", cpu_usage.as_str())
                .with("memoryUsage", memory_usage.as_str())
                .with("diskIO", disk_io.as_str()),
        );
        tracing::info!(
            cpu_usage = %cpu_usage,
            memory_usage = %memory_usage,
            disk_io = %disk_io,
            "Infrastructure simulation complete"
        );

        InfraReport {
            message: "Infrastructure simulated".to_string(),
            cpu_usage,
            memory_usage,
            disk_io,
        }
    }

    pub fn browser_monitoring(&self) -> Acknowledgement {
        self.sink.record_custom_event(
            SyntheticEvent::new(EventType::Browser).with("timestamp", now_millis()),
        );
        Acknowledgement::new("Browser monitoring simulated")
    }

    /// APM then network, carrying only the trace context forward.
    pub async fn simulate_synthetic(
        &self,
        transport: &dyn ChainTransport,
        inbound: &HeaderMap,
    ) -> Result<SyntheticReport, SimulatedFailure> {
        let headers = trace_headers(inbound);
        let (apm, network) = self
            .run_chain(
                ChainKind::Synthetic,
                transport,
                [endpoints::SIMULATE_APM, endpoints::SIMULATE_NETWORK],
                &headers,
            )
            .await?;

        let mut event = SyntheticEvent::new(EventType::Synthetic).with("network", network.to_string());
        if let Some(delay) = apm.get("delay").and_then(Value::as_u64) {
            event = event.with("apmDelay", delay);
        }
        self.sink.record_custom_event(event);

        Ok(SyntheticReport {
            message: "Synthetic monitoring simulated".to_string(),
            apm,
            network,
        })
    }

    /// Always succeeds, but pushes one error through the error path on the way.
    pub fn fake_log(&self) -> Acknowledgement {
        tracing::info!("Fake log generation started");
        self.sink.record_custom_event(
            SyntheticEvent::new(EventType::Log)
                .with("level", "info")
                .with("message", "Fake log started"),
        );

        let error = SimulatedError::new(endpoints::FAKE_LOG, "Simulated error for fake logging");
        self.sink.notice_error(&error);
        tracing::error!(error = %error, "Fake log error emitted");
        self.sink.record_custom_event(
            SyntheticEvent::new(EventType::Log)
                .with("level", "error")
                .with("message", error.message.as_str()),
        );

        Acknowledgement::new("Fake log generation complete")
    }

    /// APM then infra, forwarding every inbound header.
    pub async fn simulate_tracing(
        &self,
        transport: &dyn ChainTransport,
        inbound: &HeaderMap,
    ) -> Result<TracingReport, SimulatedFailure> {
        let mut headers = chain::forwardable_headers(inbound);
        TraceContext::from_headers(inbound).child().inject(&mut headers);

        let (apm, infra) = self
            .run_chain(
                ChainKind::Tracing,
                transport,
                [endpoints::SIMULATE_APM, endpoints::SIMULATE_INFRA],
                &headers,
            )
            .await?;

        let mut event = SyntheticEvent::new(EventType::DistributedTracing);
        if let Some(delay) = apm.get("delay").and_then(Value::as_u64) {
            event = event.with("apmDelay", delay);
        }
        if let Some(cpu) = infra.get("cpuUsage").and_then(Value::as_str) {
            event = event.with("cpuUsage", cpu);
        }
        self.sink.record_custom_event(event);

        Ok(TracingReport {
            message: "Distributed tracing simulation complete".to_string(),
            apm,
            infra,
        })
    }

    /// Random latency, then a failure with the configured probability.
    pub async fn simulate_network(&self) -> Result<NetworkReport, SimulatedFailure> {
        let latency = uniform_millis(self.random.as_ref(), self.settings.network_latency);
        sleep_ms(latency).await;

        if self.random.next_f64() < self.settings.network_failure_rate {
            return Err(self.fail(SimulatedFailure::Network { latency }));
        }

        self.sink
            .record_custom_event(SyntheticEvent::new(EventType::Network).with("latency", latency));
        Ok(NetworkReport {
            message: "Network simulation successful".to_string(),
            latency,
        })
    }

    /// Caller-controlled delay and outcome.
    pub async fn simulate_api(&self, params: ApiParams) -> Result<ApiReport, SimulatedFailure> {
        let delay = params.delay.min(self.settings.max_api_delay_ms);
        if delay < params.delay {
            tracing::debug!(
                requested_ms = params.delay,
                applied_ms = delay,
                "API delay capped"
            );
        }
        sleep_ms(delay).await;

        if params.error {
            return Err(self.fail(SimulatedFailure::Api { delay }));
        }

        self.sink.record_custom_event(
            SyntheticEvent::new(EventType::Api)
                .with("delay", delay)
                .with("status", "success"),
        );
        Ok(ApiReport {
            message: "API simulation successful".to_string(),
            delay,
        })
    }

    /// Sleep for a random delay in the slow-response window, returning it.
    pub async fn simulate_slow(&self) -> u64 {
        let delay = uniform_millis(self.random.as_ref(), self.settings.slow_delay);
        tracing::warn!(delay_ms = delay, "Slow endpoint delaying response");
        sleep_ms(delay).await;
        delay
    }

    async fn run_chain(
        &self,
        kind: ChainKind,
        transport: &dyn ChainTransport,
        [first, second]: [&str; 2],
        headers: &HeaderMap,
    ) -> Result<(Value, Value), SimulatedFailure> {
        let outcome = async {
            let a = transport.get(first, headers).await?;
            let b = transport.get(second, headers).await?;
            Ok::<_, ChainError>((a, b))
        }
        .await;

        outcome.map_err(|source| self.fail(SimulatedFailure::Chain { chain: kind, source }))
    }

    /// Report a failure to the sink and hand it back for the response.
    fn fail(&self, failure: SimulatedFailure) -> SimulatedFailure {
        let error = failure.to_error();
        tracing::warn!(origin = error.origin, error = %error, "Simulated failure");
        self.sink.notice_error(&error);
        failure
    }
}

/// Trace propagation headers only: a child `traceparent` plus `tracestate`
/// and `x-request-id` when the caller sent them.
fn trace_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    TraceContext::from_headers(inbound).child().inject(&mut headers);
    for name in [HeaderName::from_static(TRACESTATE), REQUEST_ID] {
        if let Some(value) = inbound.get(&name) {
            headers.insert(name, value.clone());
        }
    }
    headers
}

async fn sleep_ms(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
