//! Trace records
//!
//! One line of a text trace: `<timestamp> <addr> <size> <op>`.

use crate::protocol::OpKind;

/// One memory access from a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    /// Timestamp as recorded in the trace
    pub timestamp: u64,

    /// Accessed address (not yet aligned)
    pub addr: u64,

    /// Access size in bytes
    pub size: u32,

    /// Access kind
    pub op: OpKind,
}

/// Parse one trace line
///
/// Returns `None` for blank lines, lines with fewer than four fields, and
/// lines whose numeric fields don't parse. Fields past the fourth are ignored.
pub fn parse_line(line: &str) -> Option<TraceRecord> {
    let mut fields = line.split_whitespace();

    let timestamp = fields.next()?.parse().ok()?;
    let addr = parse_addr(fields.next()?)?;
    let size = fields.next()?.parse().ok()?;
    let op = parse_op(fields.next()?);

    Some(TraceRecord {
        timestamp,
        addr,
        size,
        op,
    })
}

/// Decimal, or hexadecimal with a `0x` prefix
fn parse_addr(token: &str) -> Option<u64> {
    match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}

/// `w`, `write` and `1` (any case) are writes; every other token is a read
fn parse_op(token: &str) -> OpKind {
    if token.eq_ignore_ascii_case("w") || token.eq_ignore_ascii_case("write") || token == "1" {
        OpKind::Write
    } else {
        OpKind::Read
    }
}
