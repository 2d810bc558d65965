//! Error types for cxlbench
//!
//! Provides a unified error type for all client, codec and driver operations.

use thiserror::Error;

/// Result type alias using BenchError
pub type Result<T> = std::result::Result<T, BenchError>;

/// Unified error type for cxlbench operations
#[derive(Debug, Error)]
pub enum BenchError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timed out waiting for the simulator")]
    Timeout,

    #[error("Client connection already closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    // -------------------------------------------------------------------------
    // Remote Errors
    // -------------------------------------------------------------------------
    #[error("Simulator reported failure status {status}")]
    Remote { status: u8 },

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    #[error("Invalid access size {size} (expected 1..={max})")]
    InvalidSize { size: usize, max: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl BenchError {
    /// Whether the simulator answered with a nonzero status
    pub fn is_remote(&self) -> bool {
        matches!(self, BenchError::Remote { .. })
    }

    /// Whether the failure came from the connection itself
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BenchError::Connect { .. }
                | BenchError::Io(_)
                | BenchError::Timeout
                | BenchError::Closed
                | BenchError::Protocol(_)
        )
    }

    /// Map an I/O error from a round trip, folding timeouts into `Timeout`
    pub(crate) fn from_round_trip(err: std::io::Error) -> Self {
        match err.kind() {
            // Unix reports socket timeouts as WouldBlock, Windows as TimedOut
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => BenchError::Timeout,
            _ => BenchError::Io(err),
        }
    }
}

/// Wire-level framing failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Truncated frame: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Request size field {0} does not fit in 32 bits")]
    SizeOverflow(u64),
}
