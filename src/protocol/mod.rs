//! Protocol Module
//!
//! Defines the fixed-size binary frames exchanged with the memory simulator.
//!
//! ### Request Format
//! ```text
//! ┌─────────┬──────────┬──────────┬───────────────┬──────────────┐
//! │ Op (1)  │ Addr (8) │ Size (8) │ Timestamp (8) │ Payload (64) │
//! └─────────┴──────────┴──────────┴───────────────┴──────────────┘
//! ```
//!
//! ### Operations
//! - 0x00: READ  - `size` bytes from `addr`, payload ignored
//! - 0x01: WRITE - `payload[..size]` to `addr`
//!
//! ### Response Format
//! ```text
//! ┌───────────┬──────────────┬───────────┐
//! │Status (1) │ Latency (8)  │ Data (64) │
//! └───────────┴──────────────┴───────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - anything else: simulator-defined failure

mod request;
mod response;
mod codec;

pub use request::{OpKind, Request, LINE_SIZE};
pub use response::{Response, STATUS_OK};
pub use codec::{
    encode_request, decode_request, encode_response, decode_response,
    read_request, write_request, read_response, write_response,
    REQUEST_FRAME_SIZE, RESPONSE_FRAME_SIZE,
};
