//! Configuration for cxlbench
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

/// Main configuration for a benchmark or replay run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Simulator address (host:port)
    pub server_addr: String,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Receive timeout for one response frame (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Send timeout for one request frame (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm on the simulator connection
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Replay Configuration
    // -------------------------------------------------------------------------
    /// Minimum interval between progress log lines (milliseconds)
    pub progress_interval_ms: u64,

    /// Stop replay after this many failed operations in a row (0 = never)
    pub max_consecutive_failures: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:9999".to_string(),
            connect_timeout_ms: 0,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            nodelay: true,
            progress_interval_ms: 5000,
            max_consecutive_failures: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Connect timeout as a `Duration`, if enabled
    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    /// Read timeout as a `Duration`, if enabled
    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    /// Write timeout as a `Duration`, if enabled
    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the simulator address (host:port)
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the simulator address from separate host and port
    pub fn host_port(mut self, host: &str, port: u16) -> Self {
        self.config.server_addr = format!("{}:{}", host, port);
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.config.nodelay = enabled;
        self
    }

    /// Set the progress log interval (in milliseconds)
    pub fn progress_interval_ms(mut self, ms: u64) -> Self {
        self.config.progress_interval_ms = ms;
        self
    }

    /// Set the consecutive failure limit for replay
    pub fn max_consecutive_failures(mut self, count: u64) -> Self {
        self.config.max_consecutive_failures = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
