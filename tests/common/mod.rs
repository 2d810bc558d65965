//! Shared test transports
//!
//! In-memory stand-ins for the simulator connection.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Cursor, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cxlbench::network::Transport;
use cxlbench::protocol::{decode_request, encode_response, Request, Response, REQUEST_FRAME_SIZE};

type Responder = Box<dyn FnMut(usize, &Request) -> Response + Send>;

/// Transport that answers each complete request frame via a closure
///
/// Responses are queued as soon as a request frame is written; reads hand
/// them out at most `max_chunk` bytes at a time to mimic split deliveries.
pub struct ScriptedTransport {
    pending: Vec<u8>,
    outbound: VecDeque<u8>,
    max_chunk: usize,
    responder: Responder,
    requests: Vec<Request>,
    shutdowns: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new(responder: impl FnMut(usize, &Request) -> Response + Send + 'static) -> Self {
        Self {
            pending: Vec::new(),
            outbound: VecDeque::new(),
            max_chunk: usize::MAX,
            responder: Box::new(responder),
            requests: Vec::new(),
            shutdowns: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every request succeeds with `latency_ns`; reads return the request payload
    pub fn echo(latency_ns: u64) -> Self {
        Self::new(move |_, req| Response::ok(latency_ns, req.payload))
    }

    /// Deliver responses in pieces of at most `max_chunk` bytes
    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk;
        self
    }

    /// Counter incremented every time the transport is shut down
    pub fn shutdown_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.shutdowns)
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }
}

impl Read for ScriptedTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.max_chunk).min(self.outbound.len());
        for (slot, byte) in buf.iter_mut().zip(self.outbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for ScriptedTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while self.pending.len() >= REQUEST_FRAME_SIZE {
            let frame: Vec<u8> = self.pending.drain(..REQUEST_FRAME_SIZE).collect();
            let request = decode_request(&frame)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let response = (self.responder)(self.requests.len(), &request);
            self.outbound.extend(encode_response(&response));
            self.requests.push(request);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for ScriptedTransport {
    fn shutdown(&mut self) -> io::Result<()> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn peer(&self) -> String {
        "scripted".to_string()
    }
}

/// Transport replaying fixed inbound bytes and recording outbound bytes
pub struct RawTransport {
    pub input: Cursor<Vec<u8>>,
    pub output: Vec<u8>,
    pub fail_reads_with: Option<io::ErrorKind>,
}

impl RawTransport {
    pub fn new(input: Vec<u8>) -> Self {
        Self {
            input: Cursor::new(input),
            output: Vec::new(),
            fail_reads_with: None,
        }
    }

    /// Every read fails with `kind`
    pub fn failing(kind: io::ErrorKind) -> Self {
        Self {
            fail_reads_with: Some(kind),
            ..Self::new(Vec::new())
        }
    }
}

impl Read for RawTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.fail_reads_with {
            Some(kind) => Err(io::Error::new(kind, "scripted read failure")),
            None => self.input.read(buf),
        }
    }
}

impl Write for RawTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for RawTransport {}
