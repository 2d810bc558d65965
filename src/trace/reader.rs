//! Trace Reader
//!
//! Lazily reads a text trace line by line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use super::{parse_line, TraceRecord};

/// One line of input and what it parsed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    /// 1-based line number
    pub line_no: u64,

    /// Parsed record, `None` if the line was skipped
    pub record: Option<TraceRecord>,
}

/// Reads trace lines from any buffered reader
pub struct TraceReader<R> {
    reader: R,
    line_no: u64,
    buf: Vec<u8>,
}

impl TraceReader<BufReader<File>> {
    /// Open a trace file for reading
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: Vec::new(),
        }
    }

    /// Read the next line
    ///
    /// Returns `Ok(None)` at end of input. Lines that aren't valid UTF-8
    /// are yielded as skipped rather than failing the stream.
    pub fn next_line(&mut self) -> Result<Option<TraceLine>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        let record = std::str::from_utf8(&self.buf).ok().and_then(parse_line);
        Ok(Some(TraceLine {
            line_no: self.line_no,
            record,
        }))
    }

    /// Lines read so far
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
