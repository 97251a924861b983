//! Experiment configuration structures and YAML loading.
//!
//! All simulation parameters live in two validated structs: [`PipelineConfig`]
//! for the tiered edge→fog→cloud scenario and [`BufferConfig`] for the
//! sensor→fog→courier→phone scenario. Both are immutable once validated;
//! nothing re-reads or mutates configuration mid-run.

use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::{Deserialize, Serialize};

/// An inclusive delay range in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub lo: u32,
    pub hi: u32,
}

impl DelayRange {
    pub fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }

    /// Scale both bounds by a capacity factor, truncating toward zero.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            lo: (self.lo as f64 * factor) as u32,
            hi: (self.hi as f64 * factor) as u32,
        }
    }

    fn validate(&self, what: &str) -> Result<(), ValidationError> {
        if self.lo > self.hi {
            return Err(ValidationError::InvalidRange(format!(
                "{}: lo {} exceeds hi {}",
                what, self.lo, self.hi
            )));
        }
        Ok(())
    }
}

/// Per-type delay ranges for an edge device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDelayProfile {
    pub processing: DelayRange,
    pub network: DelayRange,
}

/// Configuration for the tiered pipeline scenario.
///
/// Counts and capacities must be positive; `drain_probability` must lie in
/// `[0, 1]`. Validation happens once, before any simulation state exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub edge_count: usize,
    pub fog_count: usize,
    pub cloud_count: usize,
    pub task_count: usize,
    pub seed: u64,
    pub queue_capacity: u32,
    /// Probability that a fog node drains one queued item after each task.
    pub drain_probability: f64,
    pub stationary: EdgeDelayProfile,
    pub mobile: EdgeDelayProfile,
    /// Base fog processing range before per-node capacity scaling.
    pub fog_processing: DelayRange,
    /// Bounds for the per-node capacity factor drawn at construction.
    pub capacity_factor_lo: f64,
    pub capacity_factor_hi: f64,
    pub fog_to_cloud_network: DelayRange,
    pub cloud_processing: DelayRange,
    /// Queue delay charged per item already waiting, in ms.
    pub queue_cost_per_item: u32,
    /// Latency penalty added when an arrival finds the queue full, in ms.
    pub overflow_penalty: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            edge_count: 100,
            fog_count: 20,
            cloud_count: 3,
            task_count: 200,
            seed: 42,
            queue_capacity: 30,
            drain_probability: 0.5,
            stationary: EdgeDelayProfile {
                processing: DelayRange::new(5, 15),
                network: DelayRange::new(5, 15),
            },
            mobile: EdgeDelayProfile {
                processing: DelayRange::new(8, 20),
                network: DelayRange::new(8, 20),
            },
            fog_processing: DelayRange::new(25, 70),
            capacity_factor_lo: 0.9,
            capacity_factor_hi: 1.1,
            fog_to_cloud_network: DelayRange::new(20, 50),
            cloud_processing: DelayRange::new(10, 30),
            queue_cost_per_item: 1,
            overflow_penalty: 10,
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.edge_count == 0 {
            return Err(ValidationError::InvalidCount("edge_count must be positive".to_string()));
        }
        if self.fog_count == 0 {
            return Err(ValidationError::InvalidCount("fog_count must be positive".to_string()));
        }
        if self.cloud_count == 0 {
            return Err(ValidationError::InvalidCount("cloud_count must be positive".to_string()));
        }
        if self.task_count == 0 {
            return Err(ValidationError::InvalidCount("task_count must be positive".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidCount("queue_capacity must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.drain_probability) {
            return Err(ValidationError::InvalidProbability(self.drain_probability));
        }
        if self.capacity_factor_lo > self.capacity_factor_hi || self.capacity_factor_lo <= 0.0 {
            return Err(ValidationError::InvalidRange(format!(
                "capacity factor bounds [{}, {}] are not a positive ascending range",
                self.capacity_factor_lo, self.capacity_factor_hi
            )));
        }

        self.stationary.processing.validate("stationary.processing")?;
        self.stationary.network.validate("stationary.network")?;
        self.mobile.processing.validate("mobile.processing")?;
        self.mobile.network.validate("mobile.network")?;
        self.fog_processing.validate("fog_processing")?;
        self.fog_to_cloud_network.validate("fog_to_cloud_network")?;
        self.cloud_processing.validate("cloud_processing")?;

        Ok(())
    }

    /// Ratio of edge devices to fog nodes, a structural descriptor of the
    /// configuration independent of simulation output.
    pub fn edge_per_fog(&self) -> f64 {
        self.edge_count as f64 / self.fog_count as f64
    }

    /// Ratio of fog nodes to cloud servers.
    pub fn fog_per_cloud(&self) -> f64 {
        self.fog_count as f64 / self.cloud_count as f64
    }
}

/// Configuration for the phone-buffer scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    pub task_count: usize,
    pub seed: u64,
    /// Fixed interval between consumer reads, in ms of simulated time.
    pub read_interval_ms: u64,
    pub sensor: DelayRange,
    pub fog: DelayRange,
    pub courier: DelayRange,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            task_count: 30,
            seed: 7,
            read_interval_ms: 120,
            sensor: DelayRange::new(20, 60),
            fog: DelayRange::new(30, 80),
            courier: DelayRange::new(10, 40),
        }
    }
}

impl BufferConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.task_count == 0 {
            return Err(ValidationError::InvalidCount("task_count must be positive".to_string()));
        }
        if self.read_interval_ms == 0 {
            return Err(ValidationError::InvalidCount("read_interval_ms must be positive".to_string()));
        }
        self.sensor.validate("sensor")?;
        self.fog.validate("fog")?;
        self.courier.validate("courier")?;
        Ok(())
    }
}

/// Top-level experiment file. Both sections are optional and fall back to
/// the scenario defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub pipeline: PipelineConfig,
    pub buffer: BufferConfig,
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pipeline.validate()?;
        self.buffer.validate()?;
        Ok(())
    }
}

/// Load and validate an experiment configuration from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ExperimentConfig> {
    let path = path.as_ref();
    info!("Loading experiment configuration from {}", path.display());

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read configuration file '{}'", path.display()))?;
    let config: ExperimentConfig = serde_yaml::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", path.display()))?;

    config.validate().wrap_err("Configuration failed validation")?;
    Ok(config)
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid count: {0}")]
    InvalidCount(String),
    #[error("Invalid drain probability {0}: must be within [0, 1]")]
    InvalidProbability(f64),
    #[error("Invalid delay range: {0}")]
    InvalidRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_pipeline_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.edge_count, 100);
        assert_eq!(config.fog_count, 20);
        assert_eq!(config.cloud_count, 3);
    }

    #[test]
    fn test_zero_counts_rejected() {
        for field in ["edge", "fog", "cloud", "tasks", "capacity"] {
            let mut config = PipelineConfig::default();
            match field {
                "edge" => config.edge_count = 0,
                "fog" => config.fog_count = 0,
                "cloud" => config.cloud_count = 0,
                "tasks" => config.task_count = 0,
                _ => config.queue_capacity = 0,
            }
            assert!(
                matches!(config.validate(), Err(ValidationError::InvalidCount(_))),
                "zero {} should be rejected",
                field
            );
        }
    }

    #[test]
    fn test_drain_probability_bounds() {
        let mut config = PipelineConfig::default();
        config.drain_probability = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidProbability(_))
        ));

        config.drain_probability = -0.1;
        assert!(config.validate().is_err());

        config.drain_probability = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = PipelineConfig::default();
        config.fog_processing = DelayRange::new(70, 25);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_range_scaling_truncates() {
        let range = DelayRange::new(25, 70);
        assert_eq!(range.scaled(1.1), DelayRange::new(27, 77));
        assert_eq!(range.scaled(0.9), DelayRange::new(22, 63));
    }

    #[test]
    fn test_structural_ratios() {
        let config = PipelineConfig::default();
        assert_eq!(config.edge_per_fog(), 5.0);
        assert!((config.fog_per_cloud() - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_config_from_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
pipeline:
  edge_count: 50
  fog_count: 10
  seed: 99
buffer:
  read_interval_ms: 60
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.pipeline.edge_count, 50);
        assert_eq!(config.pipeline.fog_count, 10);
        assert_eq!(config.pipeline.seed, 99);
        // Unspecified fields take defaults
        assert_eq!(config.pipeline.cloud_count, 3);
        assert_eq!(config.buffer.read_interval_ms, 60);
        assert_eq!(config.buffer.task_count, 30);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
pipeline:
  fog_count: 0
"#
        )
        .unwrap();

        assert!(load_config(file.path()).is_err());
    }
}
