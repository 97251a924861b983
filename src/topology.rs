//! Static tier topology: edge devices, fog nodes and cloud servers.
//!
//! A topology is built once per run and never changes shape afterwards.
//! Edge devices and fog nodes carry their tier assignments from construction;
//! the only mutable state is each fog node's queue occupancy and counters,
//! which change exclusively through the [`FogNode::arrival`] and
//! [`FogNode::try_drain`] transitions so the queue bound stays in one place.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{DelayRange, PipelineConfig};
use crate::rng::DelaySource;

/// Edge device mobility class. Determines which delay profile applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Stationary,
    Mobile,
}

/// A leaf producer of tasks.
///
/// Processing and network delays are drawn once at construction from the
/// type-specific ranges, so repeated selection of the same device yields the
/// same two values across tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDevice {
    pub id: usize,
    pub device_type: DeviceType,
    pub processing_delay: u32,
    pub network_delay: u32,
    /// Index of the fog node this device always sends to.
    pub assigned_fog: usize,
}

/// Outcome of an arrival transition at a fog node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Queue had room; occupancy was incremented.
    Accepted,
    /// Queue was at capacity; occupancy unchanged, overflow counted.
    Overflow,
}

/// Middle tier node with a bounded queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FogNode {
    pub id: usize,
    /// Processing range after per-node capacity scaling.
    pub processing_delay_range: DelayRange,
    pub queue_capacity: u32,
    occupancy: u32,
    /// Index of the cloud server this node always forwards to.
    pub assigned_cloud: usize,
    pub processed_tasks: u64,
    pub queue_overflows: u64,
}

impl FogNode {
    /// Current queue occupancy, always within `0..=queue_capacity`.
    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Register one arriving task. Increments occupancy when below capacity,
    /// otherwise counts an overflow and leaves occupancy unchanged.
    pub fn arrival(&mut self) -> Arrival {
        if self.occupancy < self.queue_capacity {
            self.occupancy += 1;
            Arrival::Accepted
        } else {
            self.queue_overflows += 1;
            Arrival::Overflow
        }
    }

    /// Drain one queued item if any is waiting. Returns whether an item was
    /// actually removed.
    pub fn try_drain(&mut self) -> bool {
        if self.occupancy > 0 {
            self.occupancy -= 1;
            self.processed_tasks += 1;
            true
        } else {
            false
        }
    }
}

/// Terminal processing tier. Assumed never to overflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudServer {
    pub id: usize,
    pub processing_delay_range: DelayRange,
    pub processed_tasks: u64,
}

/// The fixed device populations for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    pub edge_devices: Vec<EdgeDevice>,
    pub fog_nodes: Vec<FogNode>,
    pub cloud_servers: Vec<CloudServer>,
}

impl Topology {
    /// Build the full topology for a validated configuration.
    ///
    /// Construction order is fixed (edge devices, then fog nodes, then cloud
    /// servers) and every draw goes through the Delay Source, so the whole
    /// topology is reproducible under the same seed.
    pub fn build(config: &PipelineConfig, delays: &mut DelaySource) -> Self {
        let mut edge_devices = Vec::with_capacity(config.edge_count);
        for id in 0..config.edge_count {
            // Even indices are stationary, odd are mobile
            let device_type = if id % 2 == 0 {
                DeviceType::Stationary
            } else {
                DeviceType::Mobile
            };
            let profile = match device_type {
                DeviceType::Stationary => config.stationary,
                DeviceType::Mobile => config.mobile,
            };
            edge_devices.push(EdgeDevice {
                id,
                device_type,
                processing_delay: delays.delay_in(profile.processing),
                network_delay: delays.delay_in(profile.network),
                assigned_fog: delays.index(config.fog_count),
            });
        }

        let mut fog_nodes = Vec::with_capacity(config.fog_count);
        for id in 0..config.fog_count {
            let capacity_factor =
                delays.factor(config.capacity_factor_lo, config.capacity_factor_hi);
            fog_nodes.push(FogNode {
                id,
                processing_delay_range: config.fog_processing.scaled(capacity_factor),
                queue_capacity: config.queue_capacity,
                occupancy: 0,
                assigned_cloud: delays.index(config.cloud_count),
                processed_tasks: 0,
                queue_overflows: 0,
            });
        }

        let cloud_servers = (0..config.cloud_count)
            .map(|id| CloudServer {
                id,
                processing_delay_range: config.cloud_processing,
                processed_tasks: 0,
            })
            .collect();

        debug!(
            "Built topology: {} edge devices, {} fog nodes, {} cloud servers",
            config.edge_count, config.fog_count, config.cloud_count
        );

        Self {
            edge_devices,
            fog_nodes,
            cloud_servers,
        }
    }
}
