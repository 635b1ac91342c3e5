//! GAIA CLI - drive an engine from the terminal.
//!
//! Three modes:
//! - `gaia test`: self-check run over a known event, JSON report
//! - `gaia benchmark`: random traffic throughput/latency measurement
//! - `gaia metrics`: random traffic, then the Prometheus text exposition

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// GAIA CLI application
#[derive(Parser)]
#[command(name = "gaia")]
#[command(about = "GAIA - evidence-based health assessment engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the built-in self checks and print a JSON report
    Test,

    /// Drive random traffic through an engine and report throughput
    Benchmark {
        /// Number of events to submit
        #[arg(long, default_value_t = 1000)]
        cycles: u64,
    },

    /// Drive random traffic and print the Prometheus text exposition
    Metrics {
        /// Number of events to submit before scraping
        #[arg(long, default_value_t = 100)]
        cycles: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::Test => commands::run_test_mode(),
        Commands::Benchmark { cycles } => commands::run_benchmark_mode(cycles),
        Commands::Metrics { cycles } => commands::run_metrics_mode(cycles),
    }
}
