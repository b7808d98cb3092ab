//! Engine configuration.
//!
//! All fields carry defaults so an empty config deserializes to a working
//! engine; the demo binary and the tests override individual fields.

use rand::Rng;
use serde::Deserialize;
use std::time::Duration;

/// Default number of statistics workers: 3.
fn default_stats_workers() -> usize {
    3
}

/// Default intake channel capacity: 1 (rendezvous-like handoff).
fn default_intake_capacity() -> usize {
    1
}

/// Default lower bound of the simulated processing delay: 0 ms.
fn default_delay_min_ms() -> u64 {
    0
}

/// Default upper bound of the simulated processing delay: 800 ms.
fn default_delay_max_ms() -> u64 {
    800
}

/// Tunables for one `OrderSystem` instance.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Size of the statistics worker pool.
    #[serde(default = "default_stats_workers")]
    pub stats_workers: usize,

    /// Capacity of the order intake channel.
    #[serde(default = "default_intake_capacity")]
    pub intake_capacity: usize,

    /// Lower bound (inclusive, milliseconds) of the simulated cost applied by
    /// statistics workers and snapshot responders.
    #[serde(default = "default_delay_min_ms")]
    pub delay_min_ms: u64,

    /// Upper bound (inclusive, milliseconds) of the simulated cost.
    #[serde(default = "default_delay_max_ms")]
    pub delay_max_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stats_workers: default_stats_workers(),
            intake_capacity: default_intake_capacity(),
            delay_min_ms: default_delay_min_ms(),
            delay_max_ms: default_delay_max_ms(),
        }
    }
}

impl EngineConfig {
    pub fn simulated_delay(&self) -> DelayRange {
        DelayRange {
            min_ms: self.delay_min_ms,
            max_ms: self.delay_max_ms.max(self.delay_min_ms),
        }
    }
}

/// Inclusive bounds for the randomized delay that models processing cost.
#[derive(Debug, Clone, Copy)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    /// Sleeps for a random duration inside the bounds.
    pub(crate) async fn sleep(self) {
        let ms = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.min_ms..=self.max_ms)
        };
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}
