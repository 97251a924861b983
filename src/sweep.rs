//! Sensitivity sweeps over the pipeline topology.
//!
//! A sweep varies one tier count while holding the others and the seed fixed,
//! running one independent simulation per point. Points share nothing: each
//! run seeds its own Delay Source, so they execute in parallel via rayon
//! while every individual run stays strictly sequential in task order.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::pipeline::{run_pipeline, PipelineSummary};

/// Which tier count a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepAxis {
    Edge,
    Fog,
    Cloud,
}

/// Scale factors applied to the base count per axis. The first factor is
/// always 1.0 so each sweep carries its own baseline point.
fn axis_factors(axis: SweepAxis) -> &'static [f64] {
    match axis {
        SweepAxis::Edge => &[1.0, 1.25, 1.5, 1.75, 2.0],
        SweepAxis::Fog => &[1.0, 1.1, 1.2, 1.3, 1.4, 1.5],
        SweepAxis::Cloud => &[1.0, 2.0, 3.0, 4.0],
    }
}

/// One evaluated sweep point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepPoint {
    pub axis: SweepAxis,
    /// Scale factor applied to the base count on the varied axis.
    pub factor: f64,
    pub edge_count: usize,
    pub fog_count: usize,
    pub cloud_count: usize,
    pub summary: PipelineSummary,
    /// Average latency change relative to this sweep's baseline, in percent.
    pub latency_change_pct: f64,
}

/// Results of all three axis sweeps around one base configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub edge: Vec<SweepPoint>,
    pub fog: Vec<SweepPoint>,
    pub cloud: Vec<SweepPoint>,
}

/// Run the edge, fog and cloud sensitivity sweeps for a base configuration.
pub fn run_sensitivity(base: &PipelineConfig) -> SweepReport {
    SweepReport {
        edge: run_axis(base, SweepAxis::Edge),
        fog: run_axis(base, SweepAxis::Fog),
        cloud: run_axis(base, SweepAxis::Cloud),
    }
}

/// Run one axis sweep. Every point is an independent run under the base
/// seed; scaled counts truncate toward zero, with a floor of one.
pub fn run_axis(base: &PipelineConfig, axis: SweepAxis) -> Vec<SweepPoint> {
    let factors = axis_factors(axis);
    info!(
        "Running {:?} sensitivity sweep over {} points (base {}/{}/{})",
        axis,
        factors.len(),
        base.edge_count,
        base.fog_count,
        base.cloud_count
    );

    let mut points: Vec<SweepPoint> = factors
        .par_iter()
        .map(|&factor| {
            let config = scaled_config(base, axis, factor);
            let summary = run_pipeline(&config).summary;
            SweepPoint {
                axis,
                factor,
                edge_count: config.edge_count,
                fog_count: config.fog_count,
                cloud_count: config.cloud_count,
                summary,
                latency_change_pct: 0.0,
            }
        })
        .collect();

    // Change is measured against the factor-1.0 point, which par_iter's
    // index preservation keeps first.
    let baseline = points[0].summary.avg_latency;
    for point in &mut points {
        point.latency_change_pct = (point.summary.avg_latency / baseline - 1.0) * 100.0;
    }
    points
}

fn scaled_config(base: &PipelineConfig, axis: SweepAxis, factor: f64) -> PipelineConfig {
    let mut config = base.clone();
    match axis {
        SweepAxis::Edge => config.edge_count = scale_count(base.edge_count, factor),
        SweepAxis::Fog => config.fog_count = scale_count(base.fog_count, factor),
        SweepAxis::Cloud => config.cloud_count = scale_count(base.cloud_count, factor),
    }
    config
}

fn scale_count(count: usize, factor: f64) -> usize {
    ((count as f64 * factor) as usize).max(1)
}
