//! Replay integration tests

#[path = "../common/mod.rs"]
mod common;
