//! # FogSim - Discrete-event simulator for edge-fog-cloud pipelines
//!
//! This library models message flow through a tiered edge → fog → cloud
//! pipeline, and a simplified sensor → fog → courier → phone-buffer variant,
//! to study how latency and queue occupancy respond to tier sizing and to
//! the frequency at which a downstream consumer drains a buffer.
//!
//! ## Overview
//!
//! Everything is a closed-form statistical sampler over configured delay
//! distributions: no real network behavior, no concurrency within a run,
//! no failure injection. A run is a bounded loop over a fixed task count,
//! fully deterministic given its seed.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: validated configuration structures and YAML loading
//! - `rng`: the seeded delay source every run owns exclusively
//! - `topology`: edge/fog/cloud populations with static tier assignments
//! - `pipeline`: per-task pipeline traversal with a bounded fog queue
//! - `buffer`: the fixed-interval buffer-drain scenario
//! - `stats`: summary statistics (mean, p95, extrema, spread)
//! - `sweep`: sensitivity sweeps over independent seeded runs
//!
//! ## Example Usage
//!
//! ```rust
//! use fogsim::config::PipelineConfig;
//! use fogsim::pipeline::run_pipeline;
//!
//! let config = PipelineConfig::default();
//! config.validate()?;
//!
//! let outcome = run_pipeline(&config);
//! assert_eq!(outcome.records.len(), config.task_count);
//! println!("avg latency: {:.2} ms", outcome.summary.avg_latency);
//! # Ok::<(), fogsim::config::ValidationError>(())
//! ```
//!
//! ## Error Handling
//!
//! Configuration problems surface as typed [`config::ValidationError`]s at
//! the validation boundary, before any simulation state exists. Queue
//! overflow is an expected, counted event, never an error, and degenerate
//! statistics inputs resolve to documented defaults instead of panicking.

pub mod buffer;
pub mod config;
pub mod pipeline;
pub mod rng;
pub mod stats;
pub mod sweep;
pub mod topology;

pub use buffer::{run_buffer, BufferOutcome, BufferSummary};
pub use config::{BufferConfig, ExperimentConfig, PipelineConfig};
pub use pipeline::{run_pipeline, PipelineOutcome, PipelineSummary, TaskRecord};
pub use sweep::{run_sensitivity, SweepReport};
