//! # cxlbench
//!
//! Benchmarking client for a remote CXL memory simulator:
//! - Fixed-size binary READ/WRITE protocol over TCP
//! - Per-operation latency measurement
//! - Trace replay with partial-failure tolerance and cooperative interruption
//! - Latency, throughput and bandwidth statistics
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────┐     ┌───────────────┐     ┌───────────────────┐
//! │  Trace Text   │────▶│ Trace Reader  │────▶│   Replay Engine   │
//! └───────────────┘     └───────────────┘     │ (align, dispatch, │
//!                                             │  accumulate)      │
//!                       ┌───────────────┐     └─────────┬─────────┘
//!                       │ Bench Driver  │               │
//!                       └───────┬───────┘               │
//!                               ▼                       ▼
//!                       ┌───────────────────────────────────────┐
//!                       │           Simulator Client            │
//!                       │   (one connection, one round trip)    │
//!                       └───────────────────┬───────────────────┘
//!                                           ▼
//!                       ┌───────────────────────────────────────┐
//!                       │  Frame Codec (89-byte req / 73 resp)  │
//!                       └───────────────────┬───────────────────┘
//!                                           ▼
//!                                   memory simulator
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod trace;
pub mod replay;
pub mod latency;
pub mod bench;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BenchError, ProtocolError, Result};
pub use config::Config;
pub use network::SimulatorClient;
pub use replay::{ReplayEngine, ReplayReport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cxlbench
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
