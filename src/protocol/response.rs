//! Response definitions
//!
//! Represents responses from the simulator.

use super::LINE_SIZE;

/// Status byte reported for a successful operation
pub const STATUS_OK: u8 = 0x00;

/// A single response frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code (0 = success, anything else is simulator-defined)
    pub status: u8,

    /// Simulated access latency in nanoseconds
    pub latency_ns: u64,

    /// Line contents for READ, unspecified for WRITE
    pub data: [u8; LINE_SIZE],
}

impl Response {
    /// Create a successful response
    pub fn ok(latency_ns: u64, data: [u8; LINE_SIZE]) -> Self {
        Self {
            status: STATUS_OK,
            latency_ns,
            data,
        }
    }

    /// Create a failure response with the given status
    pub fn failure(status: u8) -> Self {
        Self {
            status,
            latency_ns: 0,
            data: [0u8; LINE_SIZE],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
