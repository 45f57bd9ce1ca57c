//! CLI interface for btc-etl
//!
//! Provides subcommands for:
//! - `run`: Poll the spot price into the database until interrupted
//! - `once`: Run a single ETL cycle
//! - `cpu`: Sample CPU time from `/proc/stat`
//! - `history`: Show recently stored quotes
//! - `config`: Show the effective configuration

mod cpu;
mod history;
mod run;

pub use cpu::CpuArgs;
pub use history::HistoryArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "btc-etl")]
#[command(about = "Bitcoin spot price ETL poller and CPU-time sampler")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the spot price into the database
    Run(RunArgs),
    /// Run a single ETL cycle and exit
    Once,
    /// Sample CPU time counters
    Cpu(CpuArgs),
    /// Show recently stored quotes
    History(HistoryArgs),
    /// Show the effective configuration
    Config,
}

/// Resolves on the first interrupt signal
///
/// If the handler cannot be installed this never resolves and the process
/// falls back to the default signal disposition.
pub async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for interrupt signal");
        std::future::pending::<()>().await;
    }
}
