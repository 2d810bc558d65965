//! Benchmark Driver
//!
//! Fixed micro-benchmarks run directly against a simulator client. Unlike
//! trace replay, any failed operation aborts the measurement.

use std::time::{Duration, Instant};

use crate::error::{BenchError, Result};
use crate::latency::LatencySummary;
use crate::network::{SimulatorClient, Transport};
use crate::protocol::LINE_SIZE;

/// Floor for measured durations so bandwidth stays finite
const MIN_ELAPSED: Duration = Duration::from_nanos(1);

/// Upper bound on latency samples reserved up front
const MAX_PREALLOCATED_SAMPLES: u64 = 1 << 20;

/// Result of a bandwidth sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bandwidth {
    /// Write pass bandwidth (GB/s, 10^9 bytes)
    pub write_gb_per_sec: f64,

    /// Read pass bandwidth (GB/s, 10^9 bytes)
    pub read_gb_per_sec: f64,

    pub write_elapsed: Duration,
    pub read_elapsed: Duration,

    /// Operations issued in each pass
    pub ops_per_pass: u64,
}

/// Result of a single write-then-read check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWriteCheck {
    pub write_latency_ns: u64,
    pub read_latency_ns: u64,

    /// Whether the data read back equals the data written
    pub data_matches: bool,
}

/// Byte pattern used for benchmark writes: `0, 1, 2, ...` wrapping at 256
pub fn test_pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

/// Issue `num_ops` reads of `size` bytes at `i * size` and summarize their latency
pub fn measure_latency<T: Transport>(
    client: &mut SimulatorClient<T>,
    num_ops: u64,
    size: usize,
) -> Result<LatencySummary> {
    if num_ops == 0 {
        return Err(BenchError::InvalidArgument(
            "latency measurement needs at least one operation".to_string(),
        ));
    }

    // Larger runs grow the vector as samples arrive
    let mut latencies = Vec::with_capacity(num_ops.min(MAX_PREALLOCATED_SAMPLES) as usize);
    for i in 0..num_ops {
        let (_, latency) = client.read(i.wrapping_mul(size as u64), size)?;
        latencies.push(latency);
    }

    tracing::debug!("Latency pass complete: {} reads of {} bytes", num_ops, size);

    LatencySummary::from_samples(&latencies).ok_or_else(|| {
        BenchError::InvalidArgument("latency measurement produced no samples".to_string())
    })
}

/// Write then read `total_size` bytes in `chunk_size` steps at `i * chunk_size`
///
/// The write pass completes before the read pass starts.
pub fn measure_bandwidth<T: Transport>(
    client: &mut SimulatorClient<T>,
    total_size: u64,
    chunk_size: usize,
) -> Result<Bandwidth> {
    if chunk_size == 0 || chunk_size > LINE_SIZE {
        return Err(BenchError::InvalidSize {
            size: chunk_size,
            max: LINE_SIZE,
        });
    }

    let num_ops = total_size / chunk_size as u64;
    if num_ops == 0 {
        return Err(BenchError::InvalidArgument(format!(
            "total size {} is smaller than chunk size {}",
            total_size, chunk_size
        )));
    }

    let data = test_pattern(chunk_size);

    let start = Instant::now();
    for i in 0..num_ops {
        client.write(i * chunk_size as u64, &data)?;
    }
    let write_elapsed = start.elapsed().max(MIN_ELAPSED);

    let start = Instant::now();
    for i in 0..num_ops {
        client.read(i * chunk_size as u64, chunk_size)?;
    }
    let read_elapsed = start.elapsed().max(MIN_ELAPSED);

    tracing::debug!(
        "Bandwidth passes complete: {} ops each, write {:?}, read {:?}",
        num_ops,
        write_elapsed,
        read_elapsed
    );

    Ok(Bandwidth {
        write_gb_per_sec: gb_per_sec(total_size, write_elapsed),
        read_gb_per_sec: gb_per_sec(total_size, read_elapsed),
        write_elapsed,
        read_elapsed,
        ops_per_pass: num_ops,
    })
}

fn gb_per_sec(bytes: u64, elapsed: Duration) -> f64 {
    bytes as f64 / elapsed.as_secs_f64() / 1e9
}

/// Write a full test pattern line at `addr`, read it back and compare
pub fn verify_read_write<T: Transport>(
    client: &mut SimulatorClient<T>,
    addr: u64,
) -> Result<ReadWriteCheck> {
    let data = test_pattern(LINE_SIZE);
    let write_latency_ns = client.write(addr, &data)?;
    let (read_back, read_latency_ns) = client.read_line(addr)?;

    Ok(ReadWriteCheck {
        write_latency_ns,
        read_latency_ns,
        data_matches: read_back == data,
    })
}
