//! Codec Tests
//!
//! Tests for request and response frame encoding/decoding.

use std::io::Cursor;

use cxlbench::protocol::{
    decode_request, decode_response, encode_request, encode_response, read_request,
    read_response, write_request, write_response, OpKind, Request, Response, LINE_SIZE,
    REQUEST_FRAME_SIZE, RESPONSE_FRAME_SIZE,
};
use cxlbench::{BenchError, ProtocolError};

fn pattern() -> [u8; LINE_SIZE] {
    let mut data = [0u8; LINE_SIZE];
    for (i, byte) in data.iter_mut().enumerate() {
        *byte = i as u8;
    }
    data
}

// =============================================================================
// Frame Size Tests
// =============================================================================

#[test]
fn test_frame_sizes_are_packed() {
    assert_eq!(REQUEST_FRAME_SIZE, 89);
    assert_eq!(RESPONSE_FRAME_SIZE, 73);
    assert_eq!(encode_request(&Request::read(0, 64)).len(), REQUEST_FRAME_SIZE);
    assert_eq!(encode_response(&Response::failure(1)).len(), RESPONSE_FRAME_SIZE);
}

// =============================================================================
// Request Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_read_request() {
    let req = Request::read(0xDEAD_BEEF_0000, 32).with_timestamp(12345);
    let decoded = decode_request(&encode_request(&req)).unwrap();

    assert_eq!(decoded.op(), Some(OpKind::Read));
    assert_eq!(decoded.addr, 0xDEAD_BEEF_0000);
    assert_eq!(decoded.size, 32);
    assert_eq!(decoded.timestamp, 12345);
    assert_eq!(decoded.payload, [0u8; LINE_SIZE]);
}

#[test]
fn test_encode_decode_write_request() {
    let req = Request::write(0x1000, &[1, 2, 3], 3);
    let decoded = decode_request(&encode_request(&req)).unwrap();

    assert_eq!(decoded, req);
    assert_eq!(decoded.op(), Some(OpKind::Write));
    assert_eq!(&decoded.payload[..3], &[1, 2, 3]);
    assert!(decoded.payload[3..].iter().all(|&b| b == 0));
}

#[test]
fn test_write_request_truncates_oversized_payload() {
    let data = vec![0xAB; 100];
    let req = Request::write(0, &data, 64);
    assert_eq!(req.payload, [0xAB; LINE_SIZE]);
}

#[test]
fn test_request_fields_survive_for_all_sizes() {
    for size in 1..=LINE_SIZE as u32 {
        let req = Request::write(u64::from(size) * 64, &pattern()[..size as usize], size)
            .with_timestamp(u64::from(size));
        let decoded = decode_request(&encode_request(&req)).unwrap();
        assert_eq!(decoded.op(), req.op());
        assert_eq!(decoded.addr, req.addr);
        assert_eq!(decoded.size, size);
        assert_eq!(decoded.timestamp, req.timestamp);
    }
}

#[test]
fn test_unknown_op_type_passes_through() {
    let mut frame = encode_request(&Request::read(0, 8));
    frame[0] = 0x7F;
    let decoded = decode_request(&frame).unwrap();

    assert_eq!(decoded.op_type, 0x7F);
    assert_eq!(decoded.op(), None);
}

// =============================================================================
// Response Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_response_ok() {
    let resp = Response::ok(250, pattern());
    let decoded = decode_response(&encode_response(&resp)).unwrap();

    assert_eq!(decoded, resp);
    assert!(decoded.is_ok());
}

#[test]
fn test_response_inverse_pair() {
    let cases = [
        (0u8, 0u64, [0u8; LINE_SIZE]),
        (1, 1, [0xFF; LINE_SIZE]),
        (0xFF, u64::MAX, pattern()),
        (42, 1 << 40, [0x5A; LINE_SIZE]),
    ];

    for (status, latency_ns, data) in cases {
        let resp = Response {
            status,
            latency_ns,
            data,
        };
        let frame = encode_response(&resp);
        assert_eq!(decode_response(&frame).unwrap(), resp);
        assert_eq!(encode_response(&decode_response(&frame).unwrap()), frame);
    }
}

#[test]
fn test_unknown_status_passes_through() {
    let decoded = decode_response(&encode_response(&Response::failure(0xEE))).unwrap();
    assert_eq!(decoded.status, 0xEE);
    assert!(!decoded.is_ok());
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_truncated_response() {
    let frame = encode_response(&Response::ok(1, pattern()));
    let result = decode_response(&frame[..RESPONSE_FRAME_SIZE - 1]);

    assert_eq!(
        result.unwrap_err(),
        ProtocolError::Truncated {
            expected: RESPONSE_FRAME_SIZE,
            actual: RESPONSE_FRAME_SIZE - 1,
        }
    );
}

#[test]
fn test_truncated_request() {
    let result = decode_request(&[0x00, 0x01, 0x02]);
    assert!(matches!(result, Err(ProtocolError::Truncated { actual: 3, .. })));
}

#[test]
fn test_empty_response() {
    let result = decode_response(&[]);
    assert!(result.unwrap_err().to_string().contains("Truncated"));
}

#[test]
fn test_request_size_overflow() {
    let mut frame = encode_request(&Request::read(0, 8));
    frame[9..17].copy_from_slice(&(u64::from(u32::MAX) + 1).to_le_bytes());
    let result = decode_request(&frame);
    assert_eq!(result.unwrap_err(), ProtocolError::SizeOverflow(u64::from(u32::MAX) + 1));
}

#[test]
fn test_trailing_bytes_ignored() {
    let resp = Response::ok(7, pattern());
    let mut bytes = encode_response(&resp).to_vec();
    bytes.extend_from_slice(&[0xAA; 10]);
    assert_eq!(decode_response(&bytes).unwrap(), resp);
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_write_read_request() {
    let req = Request::write(0x40, &[9; 16], 16);

    let mut buffer = Vec::new();
    write_request(&mut buffer, &req).unwrap();
    assert_eq!(buffer.len(), REQUEST_FRAME_SIZE);

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_request(&mut cursor).unwrap(), req);
}

#[test]
fn test_stream_multiple_responses() {
    let responses = vec![
        Response::ok(10, pattern()),
        Response::failure(3),
        Response::ok(u64::MAX, [1; LINE_SIZE]),
    ];

    let mut buffer = Vec::new();
    for resp in &responses {
        write_response(&mut buffer, resp).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &responses {
        assert_eq!(&read_response(&mut cursor).unwrap(), expected);
    }
}

#[test]
fn test_stream_partial_frame_is_truncated() {
    let frame = encode_response(&Response::ok(1, pattern()));
    let mut cursor = Cursor::new(frame[..40].to_vec());

    match read_response(&mut cursor) {
        Err(BenchError::Protocol(ProtocolError::Truncated { expected, actual })) => {
            assert_eq!(expected, RESPONSE_FRAME_SIZE);
            assert_eq!(actual, 40);
        }
        other => panic!("Expected truncated frame, got {:?}", other),
    }
}

#[test]
fn test_stream_split_delivery() {
    use std::io::Read;

    // A reader that hands out at most 5 bytes per call
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(5);
            self.0.read(&mut buf[..n])
        }
    }

    let resp = Response::ok(99, pattern());
    let mut reader = Trickle(Cursor::new(encode_response(&resp).to_vec()));
    assert_eq!(read_response(&mut reader).unwrap(), resp);
}

// =============================================================================
// Wire Format Verification Tests
// =============================================================================

#[test]
fn test_wire_format_request() {
    let req = Request::write(0x0102_0304_0506_0708, &[0xEE], 1).with_timestamp(0x10);
    let encoded = encode_request(&req);

    // [op][addr LE x8][size LE x8][timestamp LE x8][payload x64]
    assert_eq!(encoded[0], 0x01);
    assert_eq!(&encoded[1..9], &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
    assert_eq!(&encoded[9..17], &[1, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(&encoded[17..25], &[0x10, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(encoded[25], 0xEE);
    assert!(encoded[26..].iter().all(|&b| b == 0));
}

#[test]
fn test_wire_format_response() {
    let mut data = [0u8; LINE_SIZE];
    data[0] = 0xAB;
    data[63] = 0xCD;
    let encoded = encode_response(&Response::ok(0x1234, data));

    // [status][latency LE x8][data x64]
    assert_eq!(encoded[0], 0x00);
    assert_eq!(&encoded[1..9], &[0x34, 0x12, 0, 0, 0, 0, 0, 0]);
    assert_eq!(encoded[9], 0xAB);
    assert_eq!(encoded[72], 0xCD);
}
