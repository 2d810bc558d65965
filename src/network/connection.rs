//! Connection Handler
//!
//! Serves one client connection on the loopback simulator.

use std::collections::{HashMap, HashSet};
use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{BenchError, ProtocolError, Result};
use crate::protocol::{read_request, write_response, OpKind, Request, Response, LINE_SIZE};

/// Status returned for requests with an unknown op type
pub const STATUS_BAD_OP: u8 = 0x01;

/// Status returned for injected failures
pub const STATUS_INJECTED: u8 = 0x02;

/// Behaviour knobs for the loopback simulator
#[derive(Debug, Clone, Default)]
pub struct SimulatorOptions {
    /// Latency reported for reads (nanoseconds)
    pub read_latency_ns: u64,

    /// Latency reported for writes (nanoseconds)
    pub write_latency_ns: u64,

    /// Addresses that always answer with `STATUS_INJECTED`
    pub failing_addrs: HashSet<u64>,
}

/// State shared by every connection of one simulator
#[derive(Debug, Default)]
pub struct SimulatorState {
    /// Backing lines, keyed by request address
    lines: Mutex<HashMap<u64, [u8; LINE_SIZE]>>,

    options: SimulatorOptions,

    reads: AtomicU64,
    writes: AtomicU64,
}

impl SimulatorState {
    pub fn new(options: SimulatorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Apply one request and build its response
    pub fn execute(&self, request: &Request) -> Response {
        if self.options.failing_addrs.contains(&request.addr) {
            return Response::failure(STATUS_INJECTED);
        }

        let size = (request.size as usize).min(LINE_SIZE);
        match request.op() {
            Some(OpKind::Read) => {
                self.reads.fetch_add(1, Ordering::Relaxed);
                let mut data = [0u8; LINE_SIZE];
                if let Some(line) = self.lines.lock().get(&request.addr) {
                    data[..size].copy_from_slice(&line[..size]);
                }
                Response::ok(self.options.read_latency_ns, data)
            }
            Some(OpKind::Write) => {
                self.writes.fetch_add(1, Ordering::Relaxed);
                let mut lines = self.lines.lock();
                let line = lines.entry(request.addr).or_insert([0u8; LINE_SIZE]);
                line[..size].copy_from_slice(&request.payload[..size]);
                Response::ok(self.options.write_latency_ns, [0u8; LINE_SIZE])
            }
            None => Response::failure(STATUS_BAD_OP),
        }
    }

    /// Number of READ requests served
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of WRITE requests served
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Shared simulator state
    state: Arc<SimulatorState>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, state: Arc<SimulatorState>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            state,
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Returns when the client disconnects or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Simulator connection established from {}", self.peer_addr);

        loop {
            let request = match read_request(&mut self.reader) {
                Ok(request) => request,
                Err(BenchError::Protocol(ProtocolError::Truncated { actual: 0, .. })) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(BenchError::Io(ref e))
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted
                    ) =>
                {
                    tracing::debug!("Connection reset by client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            let response = self.state.execute(&request);
            write_response(&mut self.writer, &response)?;
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
