use anyhow::Context;
use clap::Parser;
use console::bridge::ConsoleBridge;
use generator::profile::{build_levels, GeneratorConfig};
use log::info;
use std::io;
use std::path::PathBuf;
use voidcore::format;
use voidcore::prelude::GATE_INTERVAL;
use voidcore::telemetry::MetricsRecorder;
use workflow::artifacts::write_artifacts;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod console;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Void-fraction measurement session driver")]
struct Args {
    /// Replay a scripted session from YAML instead of prompting
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Run a session on synthetic readings and export the result
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Gas flux JG (m/s) for offline runs
    #[arg(long, default_value_t = 1.0)]
    jg: f64,
    /// Liquid flux JL (m/s) for offline runs
    #[arg(long, default_value_t = 0.25)]
    jl: f64,
    /// Number of synthetic readings for offline runs, rounded up to a multiple of ten
    #[arg(long, default_value_t = 10)]
    count: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Directory receiving the CSV and chart request
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        Some(WorkflowConfig::load(path)?)
    } else if args.offline {
        let levels = build_levels(&GeneratorConfig {
            count: args.count.max(1).div_ceil(GATE_INTERVAL) * GATE_INTERVAL,
            seed: args.seed,
            ..Default::default()
        })
        .context("generating synthetic readings")?;
        Some(WorkflowConfig::from_args(args.jg, args.jl, levels))
    } else {
        None
    };

    match workflow_config {
        Some(mut config) => {
            if let Some(dir) = args.output_dir {
                config.output_dir = dir;
            }
            run_workflow(config)
        }
        None => {
            let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("out"));
            let stdin = io::stdin();
            let mut bridge = ConsoleBridge::new(stdin.lock(), io::stdout(), output_dir);
            bridge.run()
        }
    }
}

fn run_workflow(config: WorkflowConfig) -> anyhow::Result<()> {
    let metrics = MetricsRecorder::new();
    let runner = Runner::new(config);
    let result = runner.execute(&metrics)?;
    let estimate = &result.snapshot.estimate;

    println!(
        "Workflow run -> measurements {}, mean {}, 95% CI {}, uncertainty {} %",
        result.snapshot.measurement_count,
        format::statistic(estimate.mean),
        estimate.interval_label(),
        format::uncertainty_pct(estimate.relative_uncertainty_pct)
    );
    if !result.rejected.is_empty() {
        println!("Skipped readings: {:?}", result.rejected);
    }

    match &result.artifacts {
        Some(artifacts) => {
            let written = write_artifacts(&runner.config().output_dir, artifacts)?;
            println!(
                "Exported {} and {} (chart renders {})",
                written.csv_path.display(),
                written.chart_path.display(),
                artifacts.png_file_name()
            );
        }
        None => println!("Session never reached a stop gate; nothing exported."),
    }

    let counts = metrics.snapshot();
    info!(
        "workflow finished: {} accepted, {} rejected, {} gates",
        counts.accepted, counts.rejected, counts.gates
    );
    Ok(())
}
