//! Trace Module
//!
//! Text memory-access traces, one access per line:
//!
//! ```text
//! <timestamp> <addr> <size> <op>
//! 100 0x1000 64 W
//! 101 4160 8 r
//! ```
//!
//! Lines that don't parse are skipped rather than treated as errors, since
//! traces from different tools often carry headers and comments.

mod record;
mod reader;

pub use record::{parse_line, TraceRecord};
pub use reader::{TraceLine, TraceReader};
