//! Transport abstraction
//!
//! The client only needs a reliable byte stream it can shut down. TCP is the
//! production transport; tests plug in scripted in-memory streams.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

/// A reliable, ordered byte stream to the simulator
pub trait Transport: Read + Write {
    /// Release the underlying connection
    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Human-readable peer name for logging
    fn peer(&self) -> String {
        "unknown".to_string()
    }
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        match TcpStream::shutdown(self, Shutdown::Both) {
            // Peer already went away; nothing left to release
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }

    fn peer(&self) -> String {
        self.peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
