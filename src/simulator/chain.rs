//! Transports for the nested calls issued by chain endpoints.
//!
//! # Design Decisions
//! - `LoopbackTransport` keeps the real network hop so the nested calls show up
//!   as separate HTTP spans downstream
//! - `InProcessTransport` composes the operations directly when no hop is wanted
//! - Either way a nested failure surfaces as `ChainError`, never as a panic

use std::time::Duration;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde_json::Value;
use url::Url;

use crate::observability::trace_context::TRACEPARENT;
use crate::simulator::{endpoints, Simulator};

/// Why a nested call failed.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Request failed with status code {status}")]
    Status { path: String, status: u16 },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid chain URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("no chain target for {0}")]
    UnknownTarget(String),
}

/// Issues one nested GET and returns its JSON body.
#[async_trait]
pub trait ChainTransport: Send + Sync {
    async fn get(&self, path: &str, headers: &HeaderMap) -> Result<Value, ChainError>;
}

/// Headers that describe the inbound connection rather than the request.
const HOP_BY_HOP: [header::HeaderName; 6] = [
    header::HOST,
    header::CONNECTION,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::TE,
];

/// Copy `headers` minus hop-by-hop entries.
pub fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in HOP_BY_HOP.iter() {
        out.remove(name);
    }
    out
}

/// Real HTTP calls back into a running simulator.
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl LoopbackTransport {
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, ChainError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .no_proxy()
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn target(&self, path: &str) -> Result<Url, ChainError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl ChainTransport for LoopbackTransport {
    async fn get(&self, path: &str, headers: &HeaderMap) -> Result<Value, ChainError> {
        let url = self.target(path)?;
        tracing::debug!(url = %url, "Issuing loopback chain call");

        let response = self
            .client
            .get(url.as_str())
            .headers(forwardable_headers(headers))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Chain call returned failure status");
            return Err(ChainError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Direct composition over the same simulator, no network.
#[derive(Clone)]
pub struct InProcessTransport {
    simulator: Simulator,
}

impl InProcessTransport {
    pub fn new(simulator: Simulator) -> Self {
        Self { simulator }
    }
}

#[async_trait]
impl ChainTransport for InProcessTransport {
    async fn get(&self, path: &str, headers: &HeaderMap) -> Result<Value, ChainError> {
        tracing::debug!(
            path,
            traceparent = ?headers.get(TRACEPARENT),
            "Issuing in-process chain call"
        );

        match path {
            endpoints::SIMULATE_APM => Ok(serde_json::to_value(self.simulator.simulate_apm().await)?),
            endpoints::SIMULATE_INFRA => Ok(serde_json::to_value(self.simulator.simulate_infra())?),
            endpoints::SIMULATE_NETWORK => match self.simulator.simulate_network().await {
                Ok(report) => Ok(serde_json::to_value(report)?),
                Err(_) => Err(ChainError::Status {
                    path: path.to_string(),
                    status: 500,
                }),
            },
            other => Err(ChainError::UnknownTarget(other.to_string())),
        }
    }
}
