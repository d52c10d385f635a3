//! CPU-bound workload behind `/fake-load`.

use std::hint::black_box;
use std::time::{Duration, Instant};

/// Outcome of one CPU burn.
#[derive(Debug, Clone, Copy)]
pub struct CpuBurn {
    /// Sum of `sqrt(i)` over every iteration.
    pub total: f64,
    pub iterations: u64,
    pub elapsed: Duration,
}

impl CpuBurn {
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Sum `sqrt(i)` for `i in 0..iterations`, blocking the calling thread.
pub fn burn_cpu(iterations: u64) -> CpuBurn {
    let start = Instant::now();
    let mut total = 0.0f64;
    for i in 0..iterations {
        total += (black_box(i) as f64).sqrt();
    }
    CpuBurn {
        total: black_box(total),
        iterations,
        elapsed: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burn_visits_every_iteration() {
        let burn = burn_cpu(4);
        let expected = 0.0 + 1.0 + 2f64.sqrt() + 3f64.sqrt();
        assert!((burn.total - expected).abs() < 1e-12);
        assert_eq!(burn.iterations, 4);
    }

    #[test]
    fn test_total_grows_with_iterations() {
        let small = burn_cpu(1_000);
        let large = burn_cpu(1_001);
        assert!((large.total - small.total - 1000f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_zero_iterations() {
        let burn = burn_cpu(0);
        assert_eq!(burn.total, 0.0);
        assert_eq!(burn.duration_ms(), 0);
    }
}
