//! Run command implementation

use crate::config::Config;
use crate::etl::{Extractor, Loader, MetricsSink, Pipeline, Poller};
use crate::store;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Stop after this many cycles
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Override the sleep between cycles (seconds)
    #[arg(long)]
    pub interval: Option<u64>,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = store::connect(&config.database)?;

        store::check_connectivity(store.as_ref(), config.database.fail_fast).await?;
        store.ensure_schema().await?;
        tracing::info!("Table bitcoin_data ready");

        let extractor = Extractor::from_config(&config.api)?;
        let pipeline = Pipeline::new(extractor, Loader::new(store.clone()), Arc::new(MetricsSink));

        let interval = Duration::from_secs(self.interval.unwrap_or(config.poller.interval_secs));
        let mut poller = Poller::new(pipeline, interval);
        if let Some(n) = self.cycles {
            poller = poller.max_cycles(n);
        }

        let result = poller.run(super::interrupt()).await;
        store.close().await;

        let cycles = result?;
        tracing::info!(cycles, "Poller stopped");
        Ok(())
    }
}
