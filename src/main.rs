use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;

use fogsim::buffer::run_buffer;
use fogsim::config::{load_config, ExperimentConfig};
use fogsim::pipeline::run_pipeline;
use fogsim::sweep::run_sensitivity;

/// Discrete-event simulator for edge-fog-cloud pipeline latency experiments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional experiment configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to write the structured results as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the tiered edge-fog-cloud pipeline scenario
    Pipeline {
        /// Also run the edge/fog/cloud sensitivity sweeps
        #[arg(long)]
        sweep: bool,
    },
    /// Run the phone-buffer scenario at 60/120/200 ms read intervals
    Buffer,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            info!("No configuration file given, using scenario defaults");
            let config = ExperimentConfig::default();
            config.validate()?;
            config
        }
    };

    let results = match args.command {
        Command::Pipeline { sweep } => run_pipeline_command(&config, sweep)?,
        Command::Buffer => run_buffer_command(&config)?,
    };

    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_string_pretty(&results)?)
            .wrap_err_with(|| format!("Failed to write results to '{}'", path.display()))?;
        info!("Results written to {}", path.display());
    }

    Ok(())
}

fn run_pipeline_command(config: &ExperimentConfig, sweep: bool) -> Result<serde_json::Value> {
    let outcome = run_pipeline(&config.pipeline);
    let summary = &outcome.summary;

    info!("Pipeline results:");
    info!("  avg latency:        {:.2} ms", summary.avg_latency);
    info!("  p95 latency:        {:.2} ms", summary.p95_latency);
    info!("  max latency:        {:.2} ms", summary.max_latency);
    info!("  min latency:        {:.2} ms", summary.min_latency);
    info!("  std latency:        {:.2} ms", summary.std_latency);
    info!("  avg fog queue delay: {:.2} ms", summary.avg_fog_queue_delay);
    info!("  edge/fog ratio:     {:.1}", summary.edge_per_fog);
    info!("  fog/cloud ratio:    {:.1}", summary.fog_per_cloud);
    info!(
        "  {} overflows, {} items drained",
        outcome.total_overflows(),
        outcome.total_drained()
    );

    if sweep {
        let report = run_sensitivity(&config.pipeline);
        for points in [&report.edge, &report.fog, &report.cloud] {
            for point in points {
                info!(
                    "  {:?} x{:.2} ({}/{}/{}): avg {:.2} ms ({:+.1}%)",
                    point.axis,
                    point.factor,
                    point.edge_count,
                    point.fog_count,
                    point.cloud_count,
                    point.summary.avg_latency,
                    point.latency_change_pct
                );
            }
        }
        return Ok(serde_json::json!({
            "outcome": outcome,
            "sensitivity": report,
        }));
    }

    Ok(serde_json::to_value(&outcome)?)
}

fn run_buffer_command(config: &ExperimentConfig) -> Result<serde_json::Value> {
    let mut runs = Vec::new();
    for interval in [60, 120, 200] {
        let mut buffer_config = config.buffer.clone();
        buffer_config.read_interval_ms = interval;
        let outcome = run_buffer(&buffer_config);
        let summary = &outcome.summary;

        info!("Buffer results at {} ms read interval:", interval);
        info!("  avg latency:   {:.2} ms", summary.avg_latency);
        info!("  p95 latency:   {:.2} ms", summary.p95);
        info!("  max buffer:    {} messages", summary.max_buffer);
        info!("  avg buffer:    {:.2} messages", summary.avg_buffer);
        info!("  time at 1 msg: {:.1}%", summary.buffer_empty_percentage);

        runs.push(outcome);
    }

    Ok(serde_json::to_value(&runs)?)
}
