//! Latency summaries
//!
//! Mean/min/max and nearest-rank percentiles over a set of latency samples.

use std::fmt;

/// Summary statistics for a set of latency samples (nanoseconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySummary {
    pub count: usize,
    pub mean: f64,
    pub min: u64,
    pub max: u64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub p999: u64,
}

impl LatencySummary {
    /// Summarize `samples`, or `None` if there are none
    pub fn from_samples(samples: &[u64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let sum: u128 = sorted.iter().map(|&s| u128::from(s)).sum();
        let mean = sum as f64 / sorted.len() as f64;

        Some(Self {
            count: sorted.len(),
            mean,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p50: percentile(&sorted, 50.0),
            p90: percentile(&sorted, 90.0),
            p99: percentile(&sorted, 99.0),
            p999: percentile(&sorted, 99.9),
        })
    }
}

/// Nearest-rank percentile of an already sorted, non-empty slice
pub fn percentile(sorted: &[u64], p: f64) -> u64 {
    debug_assert!(!sorted.is_empty());
    let rank = (p * sorted.len() as f64 / 100.0).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

impl fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={} mean={:.2}ns min={}ns max={}ns p50={}ns p90={}ns p99={}ns p99.9={}ns",
            self.count, self.mean, self.min, self.max, self.p50, self.p90, self.p99, self.p999
        )
    }
}
