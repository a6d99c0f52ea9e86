//! Pipeflow Simulator - Synthetic flow-sensor device
//!
//! Fabricates flow readings and submits them to a leak-detection ingest
//! API, the way real metering hardware in the field would.

use clap::{Parser, Subcommand};
use pipeflow_core::config::{ConfigLoader, SimulatorConfig};
use pipeflow_sense::FlowSensor;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod runner;

use runner::Simulator;

#[derive(Parser)]
#[command(name = "pipeflow-sim")]
#[command(author = "Pipeflow")]
#[command(version)]
#[command(about = "Flow-sensor device simulator", long_about = None)]
struct Cli {
    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "PIPEFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Ingest endpoint URL (overrides config file)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Device identifier (overrides config file)
    #[arg(long, global = true)]
    device_id: Option<String>,

    /// Seconds between successful submissions (overrides config file)
    #[arg(long, global = true)]
    interval: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Warm-up cycle, then submit readings until interrupted (default)
    Run,

    /// Generate and submit a single reading, then exit
    Once,

    /// Print one generated reading without sending it
    Sample,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration file, then let explicit CLI flags win
    let mut config = load_config(cli.config.clone());
    merge_cli_overrides(&mut config, &cli);

    // Setup logging - CLI verbose flag takes precedence, then config, then default
    let log_level = if cli.verbose > 0 {
        match cli.verbose {
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    } else {
        match config.simulator.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_command(&config).await,
        Commands::Once => once_command(&config).await,
        Commands::Sample => sample_command(&config),
    }
}

fn load_config(cli_path: Option<PathBuf>) -> SimulatorConfig {
    let loader = ConfigLoader::new().with_cli_path(cli_path);
    match loader.load() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            warn!("Failed to load configuration: {}, using defaults", e);
            SimulatorConfig::default()
        }
    }
}

/// Merge CLI arguments with config file settings.
/// CLI arguments take precedence when explicitly provided.
fn merge_cli_overrides(config: &mut SimulatorConfig, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint {
        config.ingest.endpoint = endpoint.clone();
    }
    if let Some(device_id) = &cli.device_id {
        config.sensor.device_id = device_id.clone();
    }
    if let Some(interval) = cli.interval {
        config.schedule.interval_secs = interval.max(1);
    }
}

async fn run_command(config: &SimulatorConfig) -> anyhow::Result<()> {
    let mut simulator = Simulator::from_config(config)?;
    simulator.run().await
}

async fn once_command(config: &SimulatorConfig) -> anyhow::Result<()> {
    let mut simulator = Simulator::from_config(config)?;
    if simulator.run_once().await {
        Ok(())
    } else {
        anyhow::bail!("submission failed")
    }
}

fn sample_command(config: &SimulatorConfig) -> anyhow::Result<()> {
    let mut sensor = FlowSensor::new(config.sensor.clone());
    let reading = sensor.read();
    println!("{}", serde_json::to_string_pretty(&reading)?);
    Ok(())
}
