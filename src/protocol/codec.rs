//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! All integers are little-endian and fields are packed back to back with no
//! alignment padding.
//!
//! ### Request Format (89 bytes)
//! ```text
//! ┌─────────┬──────────┬──────────┬───────────────┬──────────────┐
//! │ Op (1)  │ Addr (8) │ Size (8) │ Timestamp (8) │ Payload (64) │
//! └─────────┴──────────┴──────────┴───────────────┴──────────────┘
//! ```
//!
//! ### Response Format (73 bytes)
//! ```text
//! ┌───────────┬──────────────┬───────────┐
//! │Status (1) │ Latency (8)  │ Data (64) │
//! └───────────┴──────────────┴───────────┘
//! ```

use std::io::{ErrorKind, Read, Write};

use bytes::{Buf, BufMut};

use super::{Request, Response, LINE_SIZE};
use crate::error::{BenchError, ProtocolError, Result};

/// Request frame size: op (1) + addr (8) + size (8) + timestamp (8) + payload (64)
pub const REQUEST_FRAME_SIZE: usize = 1 + 8 + 8 + 8 + LINE_SIZE;

/// Response frame size: status (1) + latency (8) + data (64)
pub const RESPONSE_FRAME_SIZE: usize = 1 + 8 + LINE_SIZE;

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request into its fixed-size frame
pub fn encode_request(request: &Request) -> [u8; REQUEST_FRAME_SIZE] {
    let mut frame = [0u8; REQUEST_FRAME_SIZE];
    let mut buf = &mut frame[..];

    buf.put_u8(request.op_type);
    buf.put_u64_le(request.addr);
    buf.put_u64_le(u64::from(request.size));
    buf.put_u64_le(request.timestamp);
    buf.put_slice(&request.payload);

    frame
}

/// Decode a request frame (the simulator's view of the wire)
///
/// Bytes past the first frame are ignored.
pub fn decode_request(bytes: &[u8]) -> std::result::Result<Request, ProtocolError> {
    if bytes.len() < REQUEST_FRAME_SIZE {
        return Err(ProtocolError::Truncated {
            expected: REQUEST_FRAME_SIZE,
            actual: bytes.len(),
        });
    }

    let mut buf = &bytes[..REQUEST_FRAME_SIZE];
    let op_type = buf.get_u8();
    let addr = buf.get_u64_le();
    let raw_size = buf.get_u64_le();
    let timestamp = buf.get_u64_le();
    let mut payload = [0u8; LINE_SIZE];
    buf.copy_to_slice(&mut payload);

    let size = u32::try_from(raw_size).map_err(|_| ProtocolError::SizeOverflow(raw_size))?;

    Ok(Request {
        op_type,
        addr,
        size,
        timestamp,
        payload,
    })
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response into its fixed-size frame
pub fn encode_response(response: &Response) -> [u8; RESPONSE_FRAME_SIZE] {
    let mut frame = [0u8; RESPONSE_FRAME_SIZE];
    let mut buf = &mut frame[..];

    buf.put_u8(response.status);
    buf.put_u64_le(response.latency_ns);
    buf.put_slice(&response.data);

    frame
}

/// Decode a response frame
///
/// The status byte is passed through untouched; interpreting it is up to the caller.
pub fn decode_response(bytes: &[u8]) -> std::result::Result<Response, ProtocolError> {
    if bytes.len() < RESPONSE_FRAME_SIZE {
        return Err(ProtocolError::Truncated {
            expected: RESPONSE_FRAME_SIZE,
            actual: bytes.len(),
        });
    }

    let mut buf = &bytes[..RESPONSE_FRAME_SIZE];
    let status = buf.get_u8();
    let latency_ns = buf.get_u64_le();
    let mut data = [0u8; LINE_SIZE];
    buf.copy_to_slice(&mut data);

    Ok(Response {
        status,
        latency_ns,
        data,
    })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read exactly one frame of `N` bytes
///
/// The transport may deliver a frame in several pieces, so this keeps reading
/// until the frame is complete. EOF before that is `ProtocolError::Truncated`.
fn read_frame<R: Read, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
    let mut frame = [0u8; N];
    let mut filled = 0;

    while filled < N {
        match reader.read(&mut frame[filled..]) {
            Ok(0) => {
                return Err(ProtocolError::Truncated {
                    expected: N,
                    actual: filled,
                }
                .into())
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(BenchError::from_round_trip(e)),
        }
    }

    Ok(frame)
}

fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> Result<()> {
    writer.write_all(frame).map_err(BenchError::from_round_trip)?;
    writer.flush().map_err(BenchError::from_round_trip)
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    write_frame(writer, &encode_request(request))
}

/// Read a complete request from a stream
///
/// Blocks until a full frame is received or an error occurs
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    let frame = read_frame::<R, REQUEST_FRAME_SIZE>(reader)?;
    Ok(decode_request(&frame)?)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_frame(writer, &encode_response(response))
}

/// Read a complete response from a stream
///
/// Blocks until a full frame is received or an error occurs
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let frame = read_frame::<R, RESPONSE_FRAME_SIZE>(reader)?;
    Ok(decode_response(&frame)?)
}
