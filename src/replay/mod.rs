//! Replay Module
//!
//! Trace replay against the simulator and the statistics it produces.

mod engine;
mod stats;

pub use engine::{align_to_line, CancelFlag, ReplayEngine};
pub use stats::{ReplayOutcome, ReplayReport, ReplayStatistics};
