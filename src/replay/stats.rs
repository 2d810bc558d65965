//! Replay statistics
//!
//! Accumulators owned by the replay engine, and the report built from them
//! once replay has finished.

use std::fmt;
use std::time::Duration;

use crate::latency::LatencySummary;
use crate::protocol::OpKind;

/// Raw counters and samples gathered during one replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStatistics {
    /// Latency of every successful read (nanoseconds)
    pub read_latencies: Vec<u64>,

    /// Latency of every successful write (nanoseconds)
    pub write_latencies: Vec<u64>,

    /// Successful reads
    pub read_count: u64,

    /// Successful writes
    pub write_count: u64,

    /// Bytes moved by successful operations
    pub total_bytes: u64,

    /// Every input line, including skipped and failed ones
    pub lines_seen: u64,

    /// Lines that did not parse
    pub skipped_lines: u64,

    /// Parsed records whose operation failed
    pub failed_ops: u64,
}

impl ReplayStatistics {
    pub(crate) fn record_success(&mut self, op: OpKind, latency_ns: u64, bytes: u64) {
        match op {
            OpKind::Read => {
                self.read_latencies.push(latency_ns);
                self.read_count += 1;
            }
            OpKind::Write => {
                self.write_latencies.push(latency_ns);
                self.write_count += 1;
            }
        }
        self.total_bytes += bytes;
    }

    /// Successful operations of either kind
    pub fn total_ops(&self) -> u64 {
        self.read_count + self.write_count
    }
}

/// How a replay ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Every input line was consumed
    Completed,

    /// Stopped early by cancellation
    Interrupted,

    /// Stopped after `max_consecutive_failures` failed operations in a row
    FailureLimit,

    /// Reading the trace failed before the input was exhausted
    InputError,
}

/// Final result of a replay
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub statistics: ReplayStatistics,

    /// Wall-clock time from the start of replay to termination
    pub duration: Duration,

    pub outcome: ReplayOutcome,
}

impl ReplayReport {
    /// Successful operations per second
    pub fn ops_per_sec(&self) -> f64 {
        per_second(self.statistics.total_ops() as f64, self.duration)
    }

    /// Megabytes (10^6) per second moved by successful operations
    pub fn mb_per_sec(&self) -> f64 {
        per_second(self.statistics.total_bytes as f64 / 1e6, self.duration)
    }

    pub fn read_latency(&self) -> Option<LatencySummary> {
        LatencySummary::from_samples(&self.statistics.read_latencies)
    }

    pub fn write_latency(&self) -> Option<LatencySummary> {
        LatencySummary::from_samples(&self.statistics.write_latencies)
    }

    pub fn was_interrupted(&self) -> bool {
        self.outcome == ReplayOutcome::Interrupted
    }

    /// Whether replay consumed the whole trace
    pub fn is_complete(&self) -> bool {
        self.outcome == ReplayOutcome::Completed
    }
}

fn per_second(amount: f64, duration: Duration) -> f64 {
    let secs = duration.as_secs_f64();
    if secs > 0.0 {
        amount / secs
    } else {
        0.0
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.statistics;
        writeln!(f, "Trace Replay Statistics ({:?}):", self.outcome)?;
        writeln!(f, "  Duration: {:.2} seconds", self.duration.as_secs_f64())?;
        writeln!(
            f,
            "  Lines: {} ({} skipped, {} failed)",
            stats.lines_seen, stats.skipped_lines, stats.failed_ops
        )?;
        writeln!(
            f,
            "  Operations: {} ({:.2} ops/sec)",
            stats.total_ops(),
            self.ops_per_sec()
        )?;
        writeln!(
            f,
            "  Total data: {:.2} MB ({:.2} MB/sec)",
            stats.total_bytes as f64 / 1e6,
            self.mb_per_sec()
        )?;
        match self.read_latency() {
            Some(summary) => writeln!(f, "  Reads:  {}", summary)?,
            None => writeln!(f, "  Reads:  none")?,
        }
        match self.write_latency() {
            Some(summary) => write!(f, "  Writes: {}", summary),
            None => write!(f, "  Writes: none"),
        }
    }
}
