//! Phone-buffer simulation: a single producer stream drained on a fixed
//! time tick.
//!
//! The sensor → fog → courier stages only contribute latency; the interesting
//! state is the phone's buffer. A logical clock advances by each task's
//! latency and the consumer is entitled to one read per elapsed
//! `read_interval_ms` of clock time. Reads owed at a task's arrival are
//! issued before the arrival is buffered, so every recorded snapshot is at
//! least 1. This drain is deterministic and time-triggered, unlike the
//! probabilistic fog-queue drain in the pipeline scenario.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::BufferConfig;
use crate::rng::DelaySource;
use crate::stats;

/// Per-stage delays and buffer snapshot for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferTaskRecord {
    pub task_id: usize,
    pub sensor_delay: u32,
    pub fog_delay: u32,
    pub courier_delay: u32,
    /// Exact sum of the three stage delays.
    pub latency: u64,
    /// Clock value after this task arrived.
    pub arrival_time: u64,
    /// Buffer occupancy immediately after this task was buffered.
    pub buffer_size: u32,
}

/// Summary statistics for a buffer run. Field names are a stable contract
/// with external reporting and plotting tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferSummary {
    pub avg_latency: f64,
    pub p95: f64,
    pub max_buffer: u32,
    pub avg_buffer: f64,
    /// Percentage of snapshots at occupancy exactly 1.
    pub buffer_empty_percentage: f64,
    pub read_interval: u64,
}

/// Full result of one buffer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferOutcome {
    pub records: Vec<BufferTaskRecord>,
    /// Timestamps at which the consumer read, in issue order.
    pub read_times: Vec<u64>,
    /// Buffer occupancy after all end-of-stream reads were flushed.
    pub final_occupancy: u32,
    pub summary: BufferSummary,
}

impl BufferOutcome {
    pub fn buffer_sizes(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.buffer_size).collect()
    }
}

/// Run the buffer-drain scenario for a validated configuration.
pub fn run_buffer(config: &BufferConfig) -> BufferOutcome {
    let mut delays = DelaySource::from_seed(config.seed);

    info!(
        "Simulating {} buffered tasks with a {} ms read interval (seed {})",
        config.task_count, config.read_interval_ms, config.seed
    );

    // Stage delays are drawn vector-by-vector, sensor first, so the draw
    // order is independent of the read interval.
    let sensor: Vec<u32> = (0..config.task_count).map(|_| delays.delay_in(config.sensor)).collect();
    let fog: Vec<u32> = (0..config.task_count).map(|_| delays.delay_in(config.fog)).collect();
    let courier: Vec<u32> = (0..config.task_count).map(|_| delays.delay_in(config.courier)).collect();

    let interval = config.read_interval_ms;
    let mut clock: u64 = 0;
    let mut occupancy: u32 = 0;
    let mut read_times: Vec<u64> = Vec::new();
    let mut records = Vec::with_capacity(config.task_count);

    for task_id in 0..config.task_count {
        let latency = sensor[task_id] as u64 + fog[task_id] as u64 + courier[task_id] as u64;
        clock += latency;

        // Issue every read owed since the last task before buffering the
        // new arrival.
        flush_reads(clock, interval, &mut occupancy, &mut read_times);

        occupancy += 1;
        records.push(BufferTaskRecord {
            task_id,
            sensor_delay: sensor[task_id],
            fog_delay: fog[task_id],
            courier_delay: courier[task_id],
            latency,
            arrival_time: clock,
            buffer_size: occupancy,
        });
    }

    // Final flush: no reads are lost at stream end.
    flush_reads(clock, interval, &mut occupancy, &mut read_times);

    let summary = summarize(config, &records);
    debug!(
        "Buffer run complete: max buffer {}, {} reads issued",
        summary.max_buffer,
        read_times.len()
    );

    BufferOutcome {
        records,
        read_times,
        final_occupancy: occupancy,
        summary,
    }
}

/// Issue all reads owed up to `clock`. Each read drains one buffered item
/// when the buffer is non-empty and records its scheduled timestamp; a read
/// on an empty buffer is a no-op apart from the timestamp.
fn flush_reads(clock: u64, interval: u64, occupancy: &mut u32, read_times: &mut Vec<u64>) {
    let owed = (clock / interval) as usize;
    while read_times.len() < owed {
        if *occupancy > 0 {
            *occupancy -= 1;
        }
        read_times.push(read_times.len() as u64 * interval);
    }
}

fn summarize(config: &BufferConfig, records: &[BufferTaskRecord]) -> BufferSummary {
    let latencies: Vec<f64> = records.iter().map(|r| r.latency as f64).collect();
    let sizes: Vec<u32> = records.iter().map(|r| r.buffer_size).collect();
    let sizes_f: Vec<f64> = sizes.iter().map(|&s| s as f64).collect();

    BufferSummary {
        avg_latency: stats::mean(&latencies),
        p95: stats::p95(&latencies),
        max_buffer: sizes.iter().copied().max().unwrap_or(0),
        avg_buffer: stats::mean(&sizes_f),
        buffer_empty_percentage: stats::share_at_one(&sizes),
        read_interval: config.read_interval_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_count_matches_task_count() {
        let config = BufferConfig::default();
        let outcome = run_buffer(&config);
        assert_eq!(outcome.records.len(), 30);
    }

    #[test]
    fn test_snapshots_are_at_least_one() {
        // Drains within a task step run before its arrival is buffered
        let outcome = run_buffer(&BufferConfig::default());
        for record in &outcome.records {
            assert!(record.buffer_size >= 1);
        }
    }

    #[test]
    fn test_reproducible_records() {
        let config = BufferConfig::default();
        let first = run_buffer(&config);
        let second = run_buffer(&config);
        assert_eq!(first.records, second.records);
        assert_eq!(first.read_times, second.read_times);
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let outcome = run_buffer(&BufferConfig::default());
        let mut previous = 0;
        for record in &outcome.records {
            assert!(record.arrival_time > previous);
            previous = record.arrival_time;
        }
    }

    #[test]
    fn test_read_times_are_interval_aligned() {
        let config = BufferConfig::default();
        let outcome = run_buffer(&config);
        for (i, &t) in outcome.read_times.iter().enumerate() {
            assert_eq!(t, i as u64 * config.read_interval_ms);
        }
    }

    #[test]
    fn test_final_flush_settles_all_owed_reads() {
        let config = BufferConfig::default();
        let outcome = run_buffer(&config);
        let final_clock = outcome.records.last().unwrap().arrival_time;
        assert_eq!(
            outcome.read_times.len() as u64,
            final_clock / config.read_interval_ms
        );
    }

    #[test]
    fn test_latency_additivity() {
        let outcome = run_buffer(&BufferConfig::default());
        for record in &outcome.records {
            assert_eq!(
                record.latency,
                record.sensor_delay as u64 + record.fog_delay as u64 + record.courier_delay as u64
            );
        }
    }

    #[test]
    fn test_max_buffer_not_below_average() {
        let outcome = run_buffer(&BufferConfig::default());
        assert!(outcome.summary.max_buffer as f64 >= outcome.summary.avg_buffer);
    }

    #[test]
    fn test_slower_reads_accumulate_at_least_as_much() {
        let mut config = BufferConfig::default();
        config.read_interval_ms = 60;
        let fast = run_buffer(&config);
        config.read_interval_ms = 200;
        let slow = run_buffer(&config);
        assert!(slow.summary.max_buffer >= fast.summary.max_buffer);
    }

    #[test]
    fn test_huge_interval_never_drains_mid_run() {
        let mut config = BufferConfig::default();
        // Larger than any possible total clock value for 30 tasks
        config.read_interval_ms = 1_000_000;
        let outcome = run_buffer(&config);
        for (i, record) in outcome.records.iter().enumerate() {
            assert_eq!(record.buffer_size as usize, i + 1);
        }
        assert!(outcome.read_times.is_empty());
        assert_eq!(outcome.final_occupancy, 30);
    }
}
