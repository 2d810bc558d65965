//! Tests for TraceReader

use std::io::{Cursor, Write};

use cxlbench::protocol::OpKind;
use cxlbench::trace::{parse_line, TraceReader, TraceRecord};
use tempfile::NamedTempFile;

#[test]
fn test_reader_yields_every_line() {
    let input = "# header\n100 0x1000 64 W\n\n101 4160 8 r\n";
    let lines: Vec<_> = TraceReader::new(Cursor::new(input))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].line_no, 1);
    assert_eq!(lines[0].record, None);
    assert_eq!(
        lines[1].record,
        Some(TraceRecord {
            timestamp: 100,
            addr: 0x1000,
            size: 64,
            op: OpKind::Write,
        })
    );
    assert_eq!(lines[2].record, None);
    assert_eq!(lines[3].line_no, 4);
    assert_eq!(lines[3].record.unwrap().op, OpKind::Read);
}

#[test]
fn test_reader_handles_missing_trailing_newline() {
    let mut reader = TraceReader::new(Cursor::new("1 2 3 w"));
    let line = reader.next_line().unwrap().unwrap();
    assert_eq!(line.record.unwrap().op, OpKind::Write);
    assert!(reader.next_line().unwrap().is_none());
    assert_eq!(reader.lines_read(), 1);
}

#[test]
fn test_reader_handles_crlf() {
    let lines: Vec<_> = TraceReader::new(Cursor::new("5 0x40 16 read\r\n6 0x80 16 write\r\n"))
        .map(|l| l.unwrap().record.unwrap())
        .collect();

    assert_eq!(lines[0].addr, 0x40);
    assert_eq!(lines[0].op, OpKind::Read);
    assert_eq!(lines[1].op, OpKind::Write);
}

#[test]
fn test_reader_skips_invalid_utf8() {
    let mut input = b"1 0 8 r\n".to_vec();
    input.extend_from_slice(&[0xFF, 0xFE, b' ', b'1', b'\n']);
    input.extend_from_slice(b"2 64 8 w\n");

    let lines: Vec<_> = TraceReader::new(Cursor::new(input))
        .map(|l| l.unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].record.is_some());
    assert!(lines[1].record.is_none());
    assert!(lines[2].record.is_some());
}

#[test]
fn test_open_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "10 0x2000 32 W").unwrap();
    writeln!(file, "not a record").unwrap();
    writeln!(file, "11 8192 32 R").unwrap();
    file.flush().unwrap();

    let records: Vec<_> = TraceReader::open(file.path())
        .unwrap()
        .filter_map(|l| l.unwrap().record)
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].addr, records[1].addr);
}

#[test]
fn test_open_missing_file() {
    assert!(TraceReader::open("/definitely/not/a/trace.txt").is_err());
}

#[test]
fn test_parse_line_spec_examples() {
    assert_eq!(
        parse_line("100 0x1000 64 W"),
        Some(TraceRecord {
            timestamp: 100,
            addr: 4096,
            size: 64,
            op: OpKind::Write,
        })
    );
    assert_eq!(parse_line("100 100 64 r").unwrap().op, OpKind::Read);
    assert_eq!(parse_line("garbage line"), None);
    assert_eq!(parse_line(""), None);
}
