//! CLI entry point for the attack path forecaster.
//!
//! Designed for subprocess invocation from a REST layer:
//! reads a JSON request from stdin, writes a JSON result to stdout.
//! Logs go to stderr.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use forecaster_core::EngineConfig;
use forecaster_engine::types::{AnalysisRequest, NeighborRequest, SimulateRequest};
use forecaster_engine::{read_request, ForecastEngine};

#[derive(Parser)]
#[command(name = "forecaster")]
#[command(about = "Attack path analysis and what-if simulation for identity privilege graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Dataset JSON file (overrides engine.dataset_path).
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Config file prefix (default: forecaster).
    #[arg(short, long, default_value = "forecaster", global = true)]
    config: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Enumerate and score attack paths (reads AnalysisRequest JSON from stdin).
    Analyze,
    /// Run a what-if simulation (reads SimulateRequest JSON from stdin).
    Simulate,
    /// Run a dataset scenario preset (reads AnalysisRequest JSON from stdin).
    Scenario {
        /// Preset id from the dataset's scenarioPresets.
        #[arg(long)]
        id: String,
    },
    /// Show the neighborhood of a node.
    Neighbors {
        /// Node name.
        #[arg(long)]
        node: String,
        /// Hop radius (both directions).
        #[arg(long)]
        radius: Option<usize>,
    },
    /// Summarise the loaded dataset.
    Info,
    /// Dump all nodes and edges.
    Graph,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.json_logs {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    let config = EngineConfig::load(&cli.config)?;
    let timeout = Duration::from_secs(config.analysis_timeout_secs);
    let dataset_path = cli.dataset.clone().or_else(|| config.dataset_path.clone());

    let engine = ForecastEngine::new(config);
    match dataset_path {
        Some(path) => {
            engine.load_dataset_file(&path)?;
        }
        None => tracing::warn!("No dataset configured; starting empty"),
    }

    match cli.command {
        Command::Analyze => {
            let request: AnalysisRequest = read_request(std::io::stdin().lock())?;
            let result = engine.analyze_with_timeout(request, timeout).await?;
            println!("{}", serde_json::to_string(&result)?);
        }
        Command::Simulate => {
            let request: SimulateRequest = read_request(std::io::stdin().lock())?;
            let result = engine.simulate(&request);
            println!("{}", serde_json::to_string(&result)?);
        }
        Command::Scenario { ref id } => {
            let request: AnalysisRequest = read_request(std::io::stdin().lock())?;
            let result = engine.simulate_preset(id, &request)?;
            println!("{}", serde_json::to_string(&result)?);
        }
        Command::Neighbors { ref node, radius } => {
            let request = NeighborRequest {
                node_name: node.clone(),
                radius,
            };
            let result = engine.neighbors(&request);
            println!("{}", serde_json::to_string(&result)?);
        }
        Command::Info => {
            let summary = engine.dataset_info();
            let stats = engine.graph_stats();
            println!(
                "{}",
                serde_json::to_string(&serde_json::json!({
                    "dataset": summary,
                    "graph": stats,
                    "subnets": engine.subnets(),
                    "scenarios": engine.scenario_presets(),
                }))?
            );
        }
        Command::Graph => {
            let view = engine.graph()?;
            println!("{}", serde_json::to_string(&view)?);
        }
    }

    Ok(())
}
