use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "sim-load")]
#[command(about = "Drive traffic against a running observability simulator", long_about = None)]
struct Cli {
    #[arg(short, long, env = "SIMULATOR_URL", default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call one endpoint once and print the response
    Hit {
        /// Endpoint path, e.g. simulate-apm or /api/normal
        endpoint: String,
    },
    /// Fire many requests at one endpoint and summarize latency
    Load {
        /// Endpoint path, e.g. api/normal
        #[arg(default_value = "api/normal")]
        endpoint: String,

        /// Total number of requests
        #[arg(short = 'n', long, default_value = "10")]
        requests: usize,

        /// Requests in flight at once
        #[arg(short, long, default_value = "10")]
        concurrency: usize,
    },
}

struct Sample {
    elapsed: Duration,
    success: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder().no_proxy().build()?;

    match cli.command {
        Commands::Hit { endpoint } => {
            let url = endpoint_url(&cli.url, &endpoint);
            let start = Instant::now();
            let res = client.get(&url).send().await?;
            let elapsed = start.elapsed();
            let status = res.status();
            let body: Value = res.json().await.unwrap_or(Value::Null);

            println!("{} {} ({:?})", status.as_u16(), url, elapsed);
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Commands::Load {
            endpoint,
            requests,
            concurrency,
        } => {
            let url = endpoint_url(&cli.url, &endpoint);
            let concurrency = concurrency.max(1);
            let start = Instant::now();

            let mut samples = Vec::with_capacity(requests);
            let mut remaining = requests;
            while remaining > 0 {
                let batch = remaining.min(concurrency);
                let calls = (0..batch).map(|_| timed_get(&client, &url));
                samples.extend(join_all(calls).await);
                remaining -= batch;
            }

            print_summary(&url, concurrency, start.elapsed(), &samples);
        }
    }

    Ok(())
}

fn endpoint_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

async fn timed_get(client: &reqwest::Client, url: &str) -> Sample {
    let start = Instant::now();
    let success = match client.get(url).send().await {
        Ok(res) => res.status().is_success(),
        Err(e) => {
            eprintln!("request failed: {e}");
            false
        }
    };
    Sample {
        elapsed: start.elapsed(),
        success,
    }
}

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[idx]
}

fn print_summary(url: &str, concurrency: usize, total: Duration, samples: &[Sample]) {
    let mut latencies: Vec<Duration> = samples.iter().map(|s| s.elapsed).collect();
    latencies.sort();
    let ok = samples.iter().filter(|s| s.success).count();
    let rps = samples.len() as f64 / total.as_secs_f64().max(f64::EPSILON);

    println!("\n--- Load Results: {url} ---");
    println!("Total Requests: {}", samples.len());
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", total);
    println!("Requests/sec:   {:.2}", rps);
    println!("P50 Latency:    {:?}", percentile(&latencies, 0.50));
    println!("P95 Latency:    {:?}", percentile(&latencies, 0.95));
    println!("P99 Latency:    {:?}", percentile(&latencies, 0.99));
    println!("Success Rate:   {}/{}", ok, samples.len());
    println!("-------------------------\n");
}
