use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use timed_qsim::{SimConfig, SimulationRequest, SimulationResponse};
use tracing_subscriber::EnvFilter;

/// Simulate a timed quantum circuit described as JSON.
#[derive(Parser)]
#[command(name = "timed-qsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Request file; reads stdin when omitted or `-`
    input: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shots drawn when the request does not say
    #[arg(short, long, env = "QSIM_SHOTS")]
    shots: Option<usize>,

    /// Fixed RNG seed
    #[arg(long, env = "QSIM_SEED")]
    seed: Option<u64>,

    /// Largest accepted qubit count
    #[arg(long, env = "QSIM_MAX_QUBITS")]
    max_qubits: Option<usize>,

    /// Number of time steps a circuit may use
    #[arg(long, env = "QSIM_MAX_TIME_STEPS")]
    max_time_steps: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

impl Cli {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(max_qubits) = self.max_qubits {
            config.max_qubits = max_qubits;
        }
        if let Some(max_time_steps) = self.max_time_steps {
            config.max_time_steps = max_time_steps;
        }
        Ok(config)
    }

    fn read_request(&self) -> Result<SimulationRequest> {
        let text = match &self.input {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read request {}", path.display()))?,
            _ => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read request from stdin")?;
                text
            }
        };
        serde_json::from_str(&text).context("Failed to parse request")
    }
}

fn print_text(response: &SimulationResponse) {
    println!("{}", response.diagram);
    println!();

    let total: usize = response.results.values().sum();
    for (bits, count) in &response.results {
        println!(
            "{bits}: {count:>6} ({:5.1}%)",
            100.0 * *count as f64 / total as f64
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.sim_config()?;
    let request = cli.read_request()?;
    let response = request.simulate(&config)?;

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        Format::Text => print_text(&response),
    }

    Ok(())
}
