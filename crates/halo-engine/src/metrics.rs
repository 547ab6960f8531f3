//! Per-rank timing metrics.
//!
//! [`RankMetrics`] is collected by each rank's coordinator thread and
//! returned with the rank's outcome for logging and benchmarking.

use std::time::Duration;

/// Timing collected by one rank's coordinator thread over a run.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankMetrics {
    /// Ticks completed.
    pub ticks: u64,
    /// Time spent swapping and exchanging ghost rows, in microseconds.
    pub exchange_us: u64,
    /// Time from the post-exchange barrier to the post-compute barrier,
    /// in microseconds. Includes waiting for the slowest thread.
    pub compute_us: u64,
}

impl RankMetrics {
    pub(crate) fn add_exchange(&mut self, d: Duration) {
        self.exchange_us += micros(d);
    }

    pub(crate) fn add_compute(&mut self, d: Duration) {
        self.compute_us += micros(d);
    }

    /// Mean exchange time per tick, in microseconds.
    pub fn mean_exchange_us(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.exchange_us as f64 / self.ticks as f64
        }
    }
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
