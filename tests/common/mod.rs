//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use observability_sim::config::{ChainMode, MillisRange, SimulatorConfig};
use observability_sim::lifecycle::Shutdown;
use observability_sim::simulator::RandomSource;
use observability_sim::telemetry::RecordingSink;
use observability_sim::HttpServer;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// One request seen by a mock backend.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub headers: HashMap<String, String>,
}

/// Requests captured by a mock backend, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<SeenRequest>>>);

impl RequestLog {
    pub fn all(&self) -> Vec<SeenRequest> {
        self.0.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.all().into_iter().map(|r| r.path).collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// Start a programmable mock backend. `f` receives the request path and
/// returns a status and a JSON body.
pub async fn start_programmable_backend<F, Fut>(addr: SocketAddr, f: F) -> RequestLog
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let f = Arc::new(f);
    let log = RequestLog::default();
    let seen = log.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let f = f.clone();
            let seen = seen.clone();
            tokio::spawn(async move {
                let (read, mut write) = socket.into_split();
                let mut reader = BufReader::new(read);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).await.is_err() {
                    return;
                }
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();

                let mut headers = HashMap::new();
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {}
                    }
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                    }
                }

                seen.0.lock().unwrap().push(SeenRequest {
                    path: path.clone(),
                    headers,
                });

                let (status, body) = f(path).await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = write.write_all(response.as_bytes()).await;
                let _ = write.shutdown().await;
            });
        }
    });

    log
}

/// Defaults with every delay shrunk to a few milliseconds.
pub fn fast_config(addr: SocketAddr) -> SimulatorConfig {
    let mut config = SimulatorConfig::default();
    config.listener.bind_address = addr.to_string();
    config.chain.mode = ChainMode::Loopback;
    config.simulation.load_iterations = 1_000;
    config.simulation.apm_delay = MillisRange::new(1, 5);
    config.simulation.network_latency = MillisRange::new(1, 5);
    config.simulation.slow_delay = MillisRange::new(1, 5);
    config
}

/// A running simulator plus the handles a test needs to inspect and stop it.
pub struct RunningSimulator {
    pub addr: SocketAddr,
    pub sink: Arc<RecordingSink>,
    pub shutdown: Shutdown,
}

impl RunningSimulator {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningSimulator {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Bind `config.listener.bind_address` and serve until the handle drops.
pub async fn start_simulator(
    config: SimulatorConfig,
    random: impl RandomSource + 'static,
) -> RunningSimulator {
    let addr: SocketAddr = config.listener.bind_address.parse().unwrap();
    let sink = Arc::new(RecordingSink::new());
    let shutdown = Shutdown::new();

    let listener = TcpListener::bind(addr).await.unwrap();
    let server = HttpServer::new(config, sink.clone(), Arc::new(random));
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    RunningSimulator {
        addr,
        sink,
        shutdown,
    }
}

/// Non-pooled client that never goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
