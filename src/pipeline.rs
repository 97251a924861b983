//! Tiered pipeline simulation: per-task traversal of edge → fog → cloud with
//! a bounded queue at the fog tier.
//!
//! Each run is a bounded, strictly sequential loop over the configured task
//! count. A task picks an edge device uniformly with replacement, reuses that
//! device's construction-time delays, draws fresh fog/cloud delays, pays a
//! queue delay proportional to the assigned fog node's pre-drain occupancy,
//! and may trigger a probabilistic background drain after its latency has
//! been recorded. An arrival at a full queue is counted as an overflow and
//! penalized, never blocked.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::rng::DelaySource;
use crate::stats;
use crate::topology::{Arrival, Topology};

/// One task's traversal through the pipeline. Immutable once produced.
///
/// `end_to_end_latency` is always the exact sum of the six delay components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: usize,
    pub edge_device: usize,
    pub fog_node: usize,
    pub cloud_server: usize,
    pub edge_processing: u32,
    pub edge_to_fog_network: u32,
    pub fog_processing: u32,
    pub fog_queue_delay: u32,
    pub fog_to_cloud_network: u32,
    pub cloud_processing: u32,
    pub end_to_end_latency: u64,
}

/// Summary statistics for a pipeline run. Field names are a stable contract
/// with external reporting and plotting tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub avg_latency: f64,
    pub p95_latency: f64,
    pub max_latency: f64,
    pub min_latency: f64,
    pub std_latency: f64,
    pub avg_fog_queue_delay: f64,
    pub edge_per_fog: f64,
    pub fog_per_cloud: f64,
}

/// Full result of one pipeline run: the ordered task records, the post-run
/// topology (with its occupancy and overflow counters), and the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub records: Vec<TaskRecord>,
    pub topology: Topology,
    pub summary: PipelineSummary,
}

impl PipelineOutcome {
    /// Total overflow events across all fog nodes.
    pub fn total_overflows(&self) -> u64 {
        self.topology.fog_nodes.iter().map(|n| n.queue_overflows).sum()
    }

    /// Total items drained by background processing across all fog nodes.
    pub fn total_drained(&self) -> u64 {
        self.topology.fog_nodes.iter().map(|n| n.processed_tasks).sum()
    }
}

/// Run the tiered pipeline scenario for a validated configuration.
///
/// The run owns its own seeded [`DelaySource`]; two runs with the same
/// configuration produce bit-identical records.
pub fn run_pipeline(config: &PipelineConfig) -> PipelineOutcome {
    let mut delays = DelaySource::from_seed(config.seed);
    let mut topology = Topology::build(config, &mut delays);

    info!(
        "Simulating {} tasks over {} edge / {} fog / {} cloud (seed {})",
        config.task_count, config.edge_count, config.fog_count, config.cloud_count, config.seed
    );

    let mut records = Vec::with_capacity(config.task_count);
    for task_id in 0..config.task_count {
        let device = &topology.edge_devices[delays.index(topology.edge_devices.len())];
        let edge_processing = device.processing_delay;
        let edge_to_fog_network = device.network_delay;
        let fog_index = device.assigned_fog;
        let device_id = device.id;

        let fog = &mut topology.fog_nodes[fog_index];
        let fog_processing = delays.delay_in(fog.processing_delay_range);

        // Queue delay reads pre-drain occupancy; the arrival itself is not
        // charged for its own slot.
        let mut fog_queue_delay = fog.occupancy() * config.queue_cost_per_item;
        if fog.arrival() == Arrival::Overflow {
            fog_queue_delay += config.overflow_penalty;
        }

        let cloud_index = fog.assigned_cloud;
        let fog_to_cloud_network = delays.delay_in(config.fog_to_cloud_network);
        let cloud = &mut topology.cloud_servers[cloud_index];
        let cloud_processing = delays.delay_in(cloud.processing_delay_range);
        cloud.processed_tasks += 1;

        let end_to_end_latency = edge_processing as u64
            + edge_to_fog_network as u64
            + fog_processing as u64
            + fog_queue_delay as u64
            + fog_to_cloud_network as u64
            + cloud_processing as u64;

        records.push(TaskRecord {
            task_id,
            edge_device: device_id,
            fog_node: fog_index,
            cloud_server: cloud_index,
            edge_processing,
            edge_to_fog_network,
            fog_processing,
            fog_queue_delay,
            fog_to_cloud_network,
            cloud_processing,
            end_to_end_latency,
        });

        // Background consumption concurrent with arrivals, evaluated after
        // the task's latency has been recorded.
        if delays.chance(config.drain_probability) {
            topology.fog_nodes[fog_index].try_drain();
        }
    }

    let summary = summarize(config, &records);
    debug!(
        "Pipeline run complete: avg {:.2} ms, p95 {:.2} ms",
        summary.avg_latency, summary.p95_latency
    );

    PipelineOutcome {
        records,
        topology,
        summary,
    }
}

fn summarize(config: &PipelineConfig, records: &[TaskRecord]) -> PipelineSummary {
    let latencies: Vec<f64> = records.iter().map(|r| r.end_to_end_latency as f64).collect();
    let queue_delays: Vec<f64> = records.iter().map(|r| r.fog_queue_delay as f64).collect();

    PipelineSummary {
        avg_latency: stats::mean(&latencies),
        p95_latency: stats::p95(&latencies),
        max_latency: stats::max(&latencies),
        min_latency: stats::min(&latencies),
        std_latency: stats::sample_std_dev(&latencies),
        avg_fog_queue_delay: stats::mean(&queue_delays),
        edge_per_fog: config.edge_per_fog(),
        fog_per_cloud: config.fog_per_cloud(),
    }
}
