//! Load testing for the simulator.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use observability_sim::simulator::ThreadRandom;
use observability_sim::telemetry::EventType;

mod common;

#[tokio::test]
async fn test_load_performance() {
    let addr: SocketAddr = "127.0.0.1:28301".parse().unwrap();
    let _sim = common::start_simulator(common::fast_config(addr), ThreadRandom).await;

    let concurrency = 20;
    let requests_per_task = 25;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let url = format!("http://{addr}/api/normal");
    let start = Instant::now();

    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let client = client.clone();
        let url = url.clone();
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for _ in 0..requests_per_task {
                let req_start = Instant::now();
                if let Ok(res) = client.get(&url).send().await {
                    if res.status().is_success() {
                        latencies.push(req_start.elapsed());
                    }
                }
            }
            latencies
        }));
    }

    let mut all_latencies = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }

    let duration = start.elapsed();
    let rps = total_requests as f64 / duration.as_secs_f64();

    if all_latencies.is_empty() {
        panic!("No successful requests recorded");
    }

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p95 = all_latencies[(all_latencies.len() as f64 * 0.95) as usize];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", rps);
    println!("P50 Latency:    {:?}", p50);
    println!("P95 Latency:    {:?}", p95);
    println!("P99 Latency:    {:?}", p99);
    println!("Success Rate:   {}/{}", all_latencies.len(), total_requests);
    println!("-------------------------\n");

    assert_eq!(all_latencies.len(), total_requests);
}

#[tokio::test]
async fn test_concurrent_event_endpoints() {
    let addr: SocketAddr = "127.0.0.1:28302".parse().unwrap();
    let sim = common::start_simulator(common::fast_config(addr), ThreadRandom).await;

    let client = common::client();
    let mut tasks = Vec::new();
    for path in ["/simulate-apm", "/browser-monitoring", "/fake-load"] {
        for _ in 0..10 {
            let client = client.clone();
            let url = sim.url(path);
            tasks.push(tokio::spawn(async move {
                client.get(&url).send().await.map(|r| r.status().is_success())
            }));
        }
    }

    for task in tasks {
        assert!(matches!(task.await.unwrap(), Ok(true)));
    }

    assert_eq!(sim.sink.count(EventType::Apm), 10);
    assert_eq!(sim.sink.count(EventType::Browser), 10);
    assert_eq!(sim.sink.count(EventType::Load), 10);
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let addr: SocketAddr = "127.0.0.1:28303".parse().unwrap();
    let sim = common::start_simulator(common::fast_config(addr), ThreadRandom).await;
    let client = common::client();

    let res = client.get(sim.url("/health")).send().await.unwrap();
    assert!(res.status().is_success());

    sim.shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(client.get(sim.url("/health")).send().await.is_err());
}
