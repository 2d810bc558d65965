//! Network Module
//!
//! Simulator client and a loopback simulator.
//!
//! ## Architecture
//! - `SimulatorClient` owns exactly one `Transport` (TCP in production)
//! - One blocking round trip at a time, no pipelining
//! - `MockSimulator`: acceptor thread + one thread per connection

mod transport;
mod client;
mod connection;
mod server;

pub use transport::Transport;
pub use client::SimulatorClient;
pub use connection::{Connection, SimulatorOptions, SimulatorState, STATUS_BAD_OP, STATUS_INJECTED};
pub use server::MockSimulator;
