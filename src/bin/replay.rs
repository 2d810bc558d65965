//! cxlbench Trace Replay Binary
//!
//! Replays a memory-access trace against the simulator. Ctrl+C stops the
//! replay after the in-flight request and still prints the statistics.

use std::path::PathBuf;

use clap::Parser;
use cxlbench::replay::{CancelFlag, ReplayEngine, ReplayOutcome};
use cxlbench::{Config, SimulatorClient};
use tracing_subscriber::{fmt, EnvFilter};

/// CXL Memory Simulator Trace Replay
#[derive(Parser, Debug)]
#[command(name = "cxlbench-replay")]
#[command(about = "Replay a memory-access trace against the CXL memory simulator")]
#[command(version)]
struct Args {
    /// Path to trace file
    trace_file: PathBuf,

    /// Simulator host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Simulator port
    #[arg(short, long, default_value = "9999")]
    port: u16,

    /// Response timeout in milliseconds (0 waits forever)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Seconds between progress log lines
    #[arg(long, default_value = "5")]
    progress_secs: u64,

    /// Give up after this many consecutive failed operations (0 = never)
    #[arg(long, default_value = "0")]
    max_failures: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cxlbench=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .host_port(&args.host, args.port)
        .read_timeout_ms(args.read_timeout_ms)
        .progress_interval_ms(args.progress_secs * 1000)
        .max_consecutive_failures(args.max_failures)
        .build();

    let mut client = match SimulatorClient::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to CXL Memory Server at {}", config.server_addr);

    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, stopping after the current request...");
        handler_flag.cancel();
    }) {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    let result = ReplayEngine::new(&mut client, &config)
        .with_cancel_flag(cancel)
        .replay_file(&args.trace_file);

    if let Err(e) = client.close() {
        tracing::warn!("Error closing connection: {}", e);
    }

    match result {
        Ok(report) => {
            println!("\n{}", report);
            if report.outcome == ReplayOutcome::InputError {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Failed to replay {}: {}", args.trace_file.display(), e);
            std::process::exit(1);
        }
    }
}
