//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use logging::init_logging;
pub use self::metrics::{
    describe_metrics, init_metrics, record_cpu_time, record_stage_duration, CPU_TIME,
    STAGE_DURATION,
};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)?;

    if config.metrics_port == 0 {
        tracing::info!("Metrics exporter disabled");
    } else {
        init_metrics(config.metrics_port)?;
    }

    Ok(())
}
