//! CPU sampler command implementation

use crate::config::SamplerConfig;
use crate::system::CpuTimeSampler;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct CpuArgs {
    /// Collect once, print the samples and exit
    #[arg(long)]
    pub once: bool,
}

impl CpuArgs {
    pub async fn execute(&self, config: &SamplerConfig) -> anyhow::Result<()> {
        let sampler = CpuTimeSampler::new(&config.stat_path);

        if self.once {
            for sample in sampler.observe()? {
                println!("{}\t{}\t{}", sample.cpu, sample.state.as_str(), sample.seconds);
            }
            return Ok(());
        }

        tracing::info!(
            path = %sampler.path().display(),
            interval_secs = config.interval_secs,
            "CPU time sampler started"
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(config.interval_secs.max(1)));
        let interrupt = super::interrupt();
        tokio::pin!(interrupt);

        loop {
            tokio::select! {
                _ = &mut interrupt => {
                    tracing::info!("Interrupt received, stopping sampler");
                    break;
                }
                _ = ticker.tick() => {
                    // A failed collection is reported and retried on the next tick
                    if let Err(e) = sampler.observe() {
                        tracing::warn!(error = %e, "CPU time collection failed");
                    }
                }
            }
        }

        Ok(())
    }
}
