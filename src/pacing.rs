// src/pacing.rs
//! Randomized delays between requests.
//!
//! All waiting goes through [`Sleeper`] so tests can record delays instead
//! of spending wall-clock time.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Uniformly random duration in `[low, high]`, millisecond resolution
pub fn random_between(low: Duration, high: Duration) -> Duration {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let low_ms = low.as_millis() as u64;
    let high_ms = high.as_millis() as u64;
    Duration::from_millis(rand::thread_rng().gen_range(low_ms..=high_ms))
}

/// Delay window between consecutive pages of the same source.
///
/// The window is multiplied by `failure_multiplier` once per consecutive
/// failed page and never exceeds `ceiling`. A multiplier of 1.0 keeps the
/// window fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct PacingPolicy {
    min: Duration,
    max: Duration,
    failure_multiplier: f64,
    ceiling: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(5),
            max: Duration::from_secs(10),
            failure_multiplier: 1.0,
            ceiling: Duration::from_secs(60),
        }
    }
}

impl PacingPolicy {
    pub fn new(min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    pub fn with_failure_multiplier(mut self, multiplier: f64) -> Self {
        self.failure_multiplier = multiplier.max(1.0);
        self
    }

    pub fn with_ceiling(mut self, ceiling: Duration) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Delay bounds after `consecutive_failures` failed pages in a row
    pub fn bounds(&self, consecutive_failures: u32) -> (Duration, Duration) {
        let factor = self
            .failure_multiplier
            .powi(consecutive_failures.min(i32::MAX as u32) as i32);
        let scale = |d: Duration| {
            let scaled = d.as_secs_f64() * factor;
            if scaled.is_finite() && scaled < self.ceiling.as_secs_f64() {
                Duration::from_secs_f64(scaled)
            } else {
                self.ceiling
            }
        };
        let low = scale(self.min).min(self.ceiling);
        let high = scale(self.max).min(self.ceiling);
        (low, high)
    }

    pub fn delay(&self, consecutive_failures: u32) -> Duration {
        let (low, high) = self.bounds(consecutive_failures);
        random_between(low, high)
    }
}
