//! cxlbench Micro-benchmark Binary
//!
//! Runs the basic read/write check, a latency pass and a bandwidth sweep.

use clap::Parser;
use cxlbench::bench::{measure_bandwidth, measure_latency, verify_read_write};
use cxlbench::{Config, Result, SimulatorClient};
use tracing_subscriber::{fmt, EnvFilter};

/// CXL Memory Simulator Benchmarks
#[derive(Parser, Debug)]
#[command(name = "cxlbench")]
#[command(about = "Latency and bandwidth benchmarks for the CXL memory simulator")]
#[command(version)]
struct Args {
    /// Simulator host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Simulator port
    #[arg(short, long, default_value = "9999")]
    port: u16,

    /// Reads issued by the latency pass
    #[arg(short, long, default_value = "1000")]
    num_ops: u64,

    /// Access size for the latency pass (bytes, at most 64)
    #[arg(short, long, default_value = "64")]
    size: usize,

    /// Bytes covered by each bandwidth pass
    #[arg(short, long, default_value = "1048576")]
    total_size: u64,

    /// Bytes per bandwidth operation (at most 64)
    #[arg(short, long, default_value = "64")]
    chunk_size: usize,

    /// Response timeout in milliseconds (0 waits forever)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,
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
        .build();

    let mut client = match SimulatorClient::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to CXL Memory Server at {}", config.server_addr);

    let result = run(&mut client, &args);

    if let Err(e) = client.close() {
        tracing::warn!("Error closing connection: {}", e);
    }

    if let Err(e) = result {
        tracing::error!("Benchmark failed: {}", e);
        std::process::exit(1);
    }
}

fn run(client: &mut SimulatorClient, args: &Args) -> Result<()> {
    println!("\nTest 1: Basic Read/Write");
    let check = verify_read_write(client, 0x1000)?;
    println!("Write latency: {} ns", check.write_latency_ns);
    println!("Read latency: {} ns", check.read_latency_ns);
    println!("Read data matches: {}", check.data_matches);

    println!("\nTest 2: Latency Statistics ({} reads)", args.num_ops);
    let latency = measure_latency(client, args.num_ops, args.size)?;
    println!("Mean latency: {:.2} ns", latency.mean);
    println!("Min latency:  {} ns", latency.min);
    println!("Max latency:  {} ns", latency.max);
    println!("p50/p99/p99.9: {} / {} / {} ns", latency.p50, latency.p99, latency.p999);

    println!("\nTest 3: Bandwidth Test ({} byte transfers)", args.total_size);
    let bandwidth = measure_bandwidth(client, args.total_size, args.chunk_size)?;
    println!("Read bandwidth:  {:.2} GB/s", bandwidth.read_gb_per_sec);
    println!("Write bandwidth: {:.2} GB/s", bandwidth.write_gb_per_sec);

    Ok(())
}
