//! Simulator Client
//!
//! Owns one connection to the memory simulator and performs synchronous
//! request/response round trips over it.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};

use crate::config::Config;
use crate::error::{BenchError, Result};
use crate::protocol::{read_response, write_request, Request, Response, LINE_SIZE};

use super::Transport;

/// Client for a single simulator connection
///
/// Every call performs exactly one round trip: one request frame is sent and
/// the call blocks until one complete response frame has arrived. The
/// connection is released by [`SimulatorClient::close`], or on drop.
pub struct SimulatorClient<T: Transport = TcpStream> {
    /// Connection, `None` once closed
    transport: Option<T>,

    /// Peer address for logging
    peer_addr: String,

    /// Round trips completed (successful or not) on this connection
    round_trips: u64,
}

impl SimulatorClient<TcpStream> {
    /// Connect to the simulator at `config.server_addr`
    ///
    /// Configures TCP_NODELAY and the read/write timeouts from `config`.
    pub fn connect(config: &Config) -> Result<Self> {
        let stream = open_stream(config).map_err(|source| BenchError::Connect {
            addr: config.server_addr.clone(),
            source,
        })?;

        tracing::debug!("Connected to simulator at {}", config.server_addr);
        Ok(Self::from_transport(stream))
    }
}

/// Establish and configure the TCP stream
fn open_stream(config: &Config) -> io::Result<TcpStream> {
    let stream = match config.connect_timeout() {
        // connect_timeout takes one resolved address; try each in turn
        Some(timeout) => {
            let mut last_err = None;
            let mut connected = None;
            for addr in config.server_addr.to_socket_addrs()? {
                match TcpStream::connect_timeout(&addr, timeout) {
                    Ok(stream) => {
                        connected = Some(stream);
                        break;
                    }
                    Err(e) => last_err = Some(e),
                }
            }
            match (connected, last_err) {
                (Some(stream), _) => stream,
                (None, Some(e)) => return Err(e),
                (None, None) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "address resolved to nothing",
                    ))
                }
            }
        }
        None => TcpStream::connect(config.server_addr.as_str())?,
    };

    // Disable Nagle's algorithm so each small request frame goes out at once
    stream.set_nodelay(config.nodelay)?;

    // An expired read timeout surfaces as a Timeout from the round trip
    stream.set_read_timeout(config.read_timeout())?;
    stream.set_write_timeout(config.write_timeout())?;

    Ok(stream)
}

impl<T: Transport> SimulatorClient<T> {
    /// Wrap an already established transport
    pub fn from_transport(transport: T) -> Self {
        let peer_addr = transport.peer();
        Self {
            transport: Some(transport),
            peer_addr,
            round_trips: 0,
        }
    }

    /// Send one request and wait for its response
    ///
    /// The response status is returned as-is; see [`read`](Self::read) and
    /// [`write`](Self::write) for the checked variants.
    ///
    /// A transport failure (timeout, I/O, framing) closes the connection:
    /// the stream may still hold a late or partial response, so it cannot be
    /// matched to any later request. Subsequent calls return
    /// [`BenchError::Closed`].
    pub fn round_trip(&mut self, request: &Request) -> Result<Response> {
        let transport = self.transport.as_mut().ok_or(BenchError::Closed)?;

        self.round_trips += 1;
        let result = write_request(transport, request).and_then(|_| read_response(transport));

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                // Stream position is unknown after a failed exchange
                self.abandon(&e);
                return Err(e);
            }
        };

        tracing::trace!(
            "{} op={} addr={:#x} size={} -> status={} latency={}ns",
            self.peer_addr,
            request.op_type,
            request.addr,
            request.size,
            response.status,
            response.latency_ns
        );

        Ok(response)
    }

    /// Read `size` bytes at `addr`
    ///
    /// Returns the data and the simulated latency in nanoseconds.
    pub fn read(&mut self, addr: u64, size: usize) -> Result<(Vec<u8>, u64)> {
        let size_field = check_size(size)?;
        let response = self.round_trip(&Request::read(addr, size_field))?;
        let response = check_status(response)?;

        // Only the requested prefix of the line is meaningful
        Ok((response.data[..size].to_vec(), response.latency_ns))
    }

    /// Read a whole line at `addr`
    pub fn read_line(&mut self, addr: u64) -> Result<(Vec<u8>, u64)> {
        self.read(addr, LINE_SIZE)
    }

    /// Write `data` at `addr`, returning the simulated latency in nanoseconds
    pub fn write(&mut self, addr: u64, data: &[u8]) -> Result<u64> {
        self.write_sized(addr, data, data.len())
    }

    /// Write with an explicit `size` field, independent of the payload length
    ///
    /// Trace replay uses this to send a zero line while forwarding the
    /// recorded access size.
    pub fn write_sized(&mut self, addr: u64, data: &[u8], size: usize) -> Result<u64> {
        if data.len() > LINE_SIZE {
            return Err(BenchError::InvalidSize {
                size: data.len(),
                max: LINE_SIZE,
            });
        }
        let size_field = check_size(size)?;
        let response = self.round_trip(&Request::write(addr, data, size_field))?;

        Ok(check_status(response)?.latency_ns)
    }

    /// Close the connection
    ///
    /// Idempotent: closing an already closed client is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut transport) = self.transport.take() {
            tracing::debug!(
                "Closing connection to {} after {} round trips",
                self.peer_addr,
                self.round_trips
            );
            transport.shutdown()?;
        }
        Ok(())
    }

    /// Drop the connection after a failed round trip
    fn abandon(&mut self, cause: &BenchError) {
        if let Some(mut transport) = self.transport.take() {
            tracing::warn!(
                "Closing connection to {} after failed round trip: {}",
                self.peer_addr,
                cause
            );
            if let Err(e) = transport.shutdown() {
                tracing::debug!("Error shutting down {}: {}", self.peer_addr, e);
            }
        }
    }

    /// Whether the connection is still open
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Number of round trips attempted on this connection
    pub fn round_trips(&self) -> u64 {
        self.round_trips
    }

    /// Borrow the transport, if still open
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }
}

impl<T: Transport> Drop for SimulatorClient<T> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::debug!("Error closing connection to {}: {}", self.peer_addr, e);
        }
    }
}

/// Validate an access size, returning it as the wire size field
fn check_size(size: usize) -> Result<u32> {
    if size == 0 || size > LINE_SIZE {
        return Err(BenchError::InvalidSize {
            size,
            max: LINE_SIZE,
        });
    }
    Ok(size as u32)
}

fn check_status(response: Response) -> Result<Response> {
    if response.is_ok() {
        Ok(response)
    } else {
        Err(BenchError::Remote {
            status: response.status,
        })
    }
}
