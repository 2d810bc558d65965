//! Loopback Simulator
//!
//! A minimal in-process memory simulator speaking the wire protocol. It keeps
//! written lines in memory and reports fixed latencies, which makes it useful
//! for exercising the client, replay engine and benchmarks without the real
//! simulator.

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::Result;

use super::connection::{Connection, SimulatorOptions, SimulatorState};

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Loopback memory simulator
pub struct MockSimulator {
    local_addr: SocketAddr,
    state: Arc<SimulatorState>,
    shutdown: Arc<AtomicBool>,
    acceptor: Option<JoinHandle<()>>,
}

impl MockSimulator {
    /// Start a simulator on an ephemeral localhost port
    pub fn start(options: SimulatorOptions) -> Result<Self> {
        Self::bind("127.0.0.1:0", options)
    }

    /// Start a simulator listening on `addr`
    pub fn bind(addr: &str, options: SimulatorOptions) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        // Non-blocking accept so the loop can observe the shutdown flag
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        let state = Arc::new(SimulatorState::new(options));
        let shutdown = Arc::new(AtomicBool::new(false));

        let acceptor = {
            let state = Arc::clone(&state);
            let shutdown = Arc::clone(&shutdown);
            thread::Builder::new()
                .name("mock-sim-accept".to_string())
                .spawn(move || accept_loop(listener, state, shutdown))?
        };

        tracing::info!("Loopback simulator listening on {}", local_addr);

        Ok(Self {
            local_addr,
            state,
            shutdown,
            acceptor: Some(acceptor),
        })
    }

    /// Address the simulator is listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Shared state, for inspecting served request counts
    pub fn state(&self) -> &SimulatorState {
        &self.state
    }

    /// Signal the acceptor to stop and wait for it
    ///
    /// Connections already accepted keep running until their client disconnects.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(acceptor) = self.acceptor.take() {
            if acceptor.join().is_err() {
                tracing::warn!("Simulator acceptor thread panicked");
            }
        }
    }
}

impl Drop for MockSimulator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn accept_loop(listener: TcpListener, state: Arc<SimulatorState>, shutdown: Arc<AtomicBool>) {
    while !shutdown.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, _)) => {
                if let Err(e) = stream.set_nonblocking(false) {
                    tracing::warn!("Failed to configure accepted stream: {}", e);
                    continue;
                }
                let state = Arc::clone(&state);
                let spawned = thread::Builder::new()
                    .name("mock-sim-conn".to_string())
                    .spawn(move || match Connection::new(stream, state) {
                        Ok(mut conn) => {
                            if let Err(e) = conn.handle() {
                                tracing::debug!("Connection {} ended: {}", conn.peer_addr(), e);
                            }
                        }
                        Err(e) => tracing::warn!("Failed to set up connection: {}", e),
                    });
                if let Err(e) = spawned {
                    tracing::warn!("Failed to spawn connection thread: {}", e);
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(e) => {
                tracing::warn!("Accept failed: {}", e);
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
        }
    }
    tracing::debug!("Loopback simulator acceptor stopped");
}
