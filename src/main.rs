use btc_etl::cli::{Cli, Commands};
use btc_etl::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    match cli.command {
        Commands::Run(args) => {
            btc_etl::telemetry::init_telemetry(&config.telemetry)?;
            tracing::info!("Starting Bitcoin spot price poller");
            args.execute(&config).await?;
        }
        Commands::Once => {
            btc_etl::telemetry::init_telemetry(&config.telemetry)?;
            tracing::info!("Running a single ETL cycle");
            let args = btc_etl::cli::RunArgs {
                cycles: Some(1),
                ..Default::default()
            };
            args.execute(&config).await?;
        }
        Commands::Cpu(args) => {
            btc_etl::telemetry::init_telemetry(&config.telemetry)?;
            tracing::info!("Starting CPU time sampler");
            args.execute(&config.sampler).await?;
        }
        Commands::History(args) => {
            btc_etl::telemetry::init_logging(&config.telemetry.log_level, config.telemetry.log_format)?;
            args.execute(&config.database).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  API: {}", config.api.url);
            println!(
                "  Database: {} (fail_fast={})",
                config.database.url, config.database.fail_fast
            );
            println!("  Poll interval: {}s", config.poller.interval_secs);
            println!(
                "  Sampler: {} every {}s",
                config.sampler.stat_path.display(),
                config.sampler.interval_secs
            );
            println!(
                "  Telemetry: metrics_port={}, log_level={}, format={:?}",
                config.telemetry.metrics_port, config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}
