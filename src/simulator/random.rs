//! Pluggable randomness for the synthetic workloads.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use rand::Rng;

use crate::config::MillisRange;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> f64;
}

/// Thread-local RNG, the production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_f64(&self) -> f64 {
        self.0
    }
}

/// Replays a queue of values, then repeats `fallback` once drained.
#[derive(Debug)]
pub struct ScriptedRandom {
    values: Mutex<VecDeque<f64>>,
    fallback: f64,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
            fallback,
        }
    }

    /// Values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&self) -> f64 {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

/// Draw a whole number of milliseconds in `[range.min_ms, range.max_ms)`.
pub fn uniform_millis(source: &dyn RandomSource, range: MillisRange) -> u64 {
    let r = source.next_f64().clamp(0.0, 1.0);
    let offset = (r * range.span() as f64).floor() as u64;
    // r == 1.0 would land on max_ms
    range.min_ms + offset.min(range.span().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_millis_bounds() {
        let range = MillisRange::new(500, 3000);
        assert_eq!(uniform_millis(&FixedRandom(0.0), range), 500);
        assert_eq!(uniform_millis(&FixedRandom(0.5), range), 1750);
        assert_eq!(uniform_millis(&FixedRandom(0.999_999), range), 2999);
        assert_eq!(uniform_millis(&FixedRandom(1.0), range), 2999);
    }

    #[test]
    fn test_thread_random_in_unit_interval() {
        let source = ThreadRandom;
        for _ in 0..1000 {
            let r = source.next_f64();
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn test_scripted_then_fallback() {
        let source = ScriptedRandom::new([0.1, 0.2], 0.9);
        assert_eq!(source.next_f64(), 0.1);
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.next_f64(), 0.2);
        assert_eq!(source.next_f64(), 0.9);
        assert_eq!(source.next_f64(), 0.9);
    }
}
