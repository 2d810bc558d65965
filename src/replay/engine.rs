//! Replay Engine
//!
//! Drives a simulator client from a trace, one record at a time.
//!
//! ## States
//! - **Running**: records are parsed, aligned and dispatched
//! - **Interrupted**: cancellation observed between records; nothing new is sent
//! - **Finished**: statistics are frozen into a [`ReplayReport`]
//!
//! A failing record never leaves Running. It is counted and replay moves on,
//! unless a consecutive-failure limit is configured. The report's
//! [`ReplayOutcome`] records why replay stopped.

use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::Result;
use crate::network::{SimulatorClient, Transport};
use crate::protocol::{OpKind, LINE_SIZE};
use crate::trace::{TraceLine, TraceReader};

use super::{ReplayOutcome, ReplayReport, ReplayStatistics};

/// Progress is considered every this many lines
const PROGRESS_CHECK_LINES: u64 = 1000;

/// Payload sent for every replayed write; traces carry shape, not content
const ZERO_LINE: [u8; LINE_SIZE] = [0u8; LINE_SIZE];

/// Round an address down to the start of its cache line
pub fn align_to_line(addr: u64) -> u64 {
    (addr / LINE_SIZE as u64) * LINE_SIZE as u64
}

/// Cooperative cancellation signal, shareable across threads
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that replay stop before its next record
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Replays trace records against one simulator client
///
/// The engine is the only writer of its [`ReplayStatistics`]; they are handed
/// out only inside the final report, after replay has stopped.
pub struct ReplayEngine<'c, T: Transport> {
    client: &'c mut SimulatorClient<T>,
    cancel: CancelFlag,
    progress_interval: Duration,
    max_consecutive_failures: u64,
    stats: ReplayStatistics,
    consecutive_failures: u64,
}

impl<'c, T: Transport> ReplayEngine<'c, T> {
    /// Create an engine using replay settings from `config`
    pub fn new(client: &'c mut SimulatorClient<T>, config: &Config) -> Self {
        Self {
            client,
            cancel: CancelFlag::new(),
            progress_interval: config.progress_interval(),
            max_consecutive_failures: config.max_consecutive_failures,
            stats: ReplayStatistics::default(),
            consecutive_failures: 0,
        }
    }

    /// Use `cancel` as this engine's cancellation signal
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle that cancels this engine
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Replay the trace file at `path`
    ///
    /// Failing to open the file is an error; everything after that is
    /// reflected in the report.
    pub fn replay_file(self, path: impl AsRef<Path>) -> Result<ReplayReport> {
        let path = path.as_ref();
        let reader = TraceReader::open(path)?;
        tracing::info!("Replaying trace from {}", path.display());
        Ok(self.run(reader))
    }

    /// Replay a trace from any buffered reader
    pub fn replay_reader<R: BufRead>(self, reader: R) -> ReplayReport {
        self.run(TraceReader::new(reader))
    }

    /// Replay a sequence of trace lines
    ///
    /// A read error on the input ends replay with [`ReplayOutcome::InputError`];
    /// statistics gathered up to that point are kept.
    pub fn run<I>(mut self, lines: I) -> ReplayReport
    where
        I: IntoIterator<Item = Result<TraceLine>>,
    {
        let start = Instant::now();
        let mut last_progress = start;
        let mut outcome = ReplayOutcome::Completed;

        for line in lines {
            // Cancellation is only honored between records
            if self.cancel.is_cancelled() {
                tracing::info!("Trace replay interrupted");
                outcome = ReplayOutcome::Interrupted;
                break;
            }

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("Error reading trace after {} lines: {}", self.stats.lines_seen, e);
                    outcome = ReplayOutcome::InputError;
                    break;
                }
            };

            self.process(line);

            if self.failure_limit_reached() {
                tracing::error!(
                    "Stopping replay after {} consecutive failures",
                    self.consecutive_failures
                );
                outcome = ReplayOutcome::FailureLimit;
                break;
            }

            // Only look at the clock every PROGRESS_CHECK_LINES lines
            if self.stats.lines_seen % PROGRESS_CHECK_LINES == 0 {
                let now = Instant::now();
                if now.duration_since(last_progress) >= self.progress_interval {
                    tracing::info!(
                        "Processed {} lines ({} ops, {} failed)",
                        self.stats.lines_seen,
                        self.stats.total_ops(),
                        self.stats.failed_ops
                    );
                    last_progress = now;
                }
            }
        }

        let report = ReplayReport {
            statistics: self.stats,
            duration: start.elapsed(),
            outcome,
        };

        tracing::info!(
            "Replay finished ({:?}): {} lines, {} reads, {} writes, {} failed, {} skipped",
            report.outcome,
            report.statistics.lines_seen,
            report.statistics.read_count,
            report.statistics.write_count,
            report.statistics.failed_ops,
            report.statistics.skipped_lines
        );

        report
    }

    /// Handle one input line
    fn process(&mut self, line: TraceLine) {
        self.stats.lines_seen += 1;

        // Unparseable lines are counted, never sent
        let Some(record) = line.record else {
            self.stats.skipped_lines += 1;
            return;
        };

        // Requests always target a whole line; sizes beyond it are clamped
        let addr = align_to_line(record.addr);
        let size = (record.size as usize).min(LINE_SIZE);

        // Writes carry a zero line with the recorded size
        let result = match record.op {
            OpKind::Read => self.client.read(addr, size).map(|(_, latency)| latency),
            OpKind::Write => self.client.write_sized(addr, &ZERO_LINE, size),
        };

        match result {
            Ok(latency_ns) => {
                self.stats.record_success(record.op, latency_ns, size as u64);
                self.consecutive_failures = 0;
            }
            // Remote, transport and validation failures all count against the record
            Err(e) => {
                tracing::warn!("Error on line {}: {}", line.line_no, e);
                self.stats.failed_ops += 1;
                self.consecutive_failures += 1;
            }
        }
    }

    fn failure_limit_reached(&self) -> bool {
        self.max_consecutive_failures > 0
            && self.consecutive_failures >= self.max_consecutive_failures
    }
}
