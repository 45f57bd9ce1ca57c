//! Prometheus metrics
//!
//! - `stage_duration` (histogram, ms): ETL stage wall time, labelled by `stage`
//! - `system.cpu.time` (counter, s): absolute CPU time, labelled by `cpu` and `state`

use crate::etl::Stage;
use crate::system::CpuState;
use metrics::Unit;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;

/// Histogram of ETL stage durations
pub const STAGE_DURATION: &str = "stage_duration";
/// Cumulative CPU time per cpu and state
pub const CPU_TIME: &str = "system.cpu.time";

const STAGE_BUCKETS_MS: &[f64] = &[
    1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0,
];

/// Install the Prometheus recorder and its scrape endpoint on `port`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(Matcher::Full(STAGE_DURATION.to_string()), STAGE_BUCKETS_MS)?
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    describe_metrics();
    tracing::info!(%addr, "Prometheus metrics endpoint listening");

    Ok(())
}

/// Register units and descriptions with the active recorder
pub fn describe_metrics() {
    metrics::describe_histogram!(
        STAGE_DURATION,
        Unit::Milliseconds,
        "Duration of the ETL pipeline stages"
    );
    metrics::describe_counter!(CPU_TIME, Unit::Seconds, "CPU time");
}

/// Record the duration of one ETL stage
pub fn record_stage_duration(stage: Stage, duration_ms: f64) {
    metrics::histogram!(STAGE_DURATION, "stage" => stage.as_str()).record(duration_ms);
}

/// Publish an absolute CPU time reading
pub fn record_cpu_time(cpu: &str, state: CpuState, seconds: u64) {
    metrics::counter!(CPU_TIME, "cpu" => cpu.to_string(), "state" => state.as_str())
        .absolute(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};
    use metrics_util::MetricKind;

    type Entry = (MetricKind, String, Vec<(String, String)>, Option<Unit>, DebugValue);

    fn capture(f: impl FnOnce()) -> Vec<Entry> {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        metrics::with_local_recorder(&recorder, f);

        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(key, unit, _, value)| {
                let (kind, key) = key.into_parts();
                let labels = key
                    .labels()
                    .map(|l| (l.key().to_string(), l.value().to_string()))
                    .collect();
                (kind, key.name().to_string(), labels, unit, value)
            })
            .collect()
    }

    fn labels(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_stage_duration_histogram() {
        let entries = capture(|| {
            describe_metrics();
            record_stage_duration(Stage::Extract, 1.5);
        });

        assert_eq!(entries.len(), 1);
        let (kind, name, labels_seen, unit, value) = &entries[0];
        assert_eq!(*kind, MetricKind::Histogram);
        assert_eq!(name, "stage_duration");
        assert_eq!(*labels_seen, labels(&[("stage", "extract")]));
        assert_eq!(*unit, Some(Unit::Milliseconds));
        match value {
            DebugValue::Histogram(values) => {
                let values: Vec<f64> = values.iter().map(|v| v.into_inner()).collect();
                assert_eq!(values, vec![1.5]);
            }
            other => panic!("expected histogram, got {other:?}"),
        }
    }

    #[test]
    fn test_stage_label_per_stage() {
        let entries = capture(|| {
            record_stage_duration(Stage::Extract, 1.0);
            record_stage_duration(Stage::Transform, 2.0);
            record_stage_duration(Stage::Load, 3.0);
        });

        let mut stages: Vec<String> = entries
            .iter()
            .map(|(_, _, labels, _, _)| labels[0].1.clone())
            .collect();
        stages.sort();
        assert_eq!(stages, vec!["extract", "load", "transform"]);
    }

    #[test]
    fn test_cpu_time_absolute_counter() {
        let entries = capture(|| {
            describe_metrics();
            record_cpu_time("cpu0", CpuState::Nice, 5);
            record_cpu_time("cpu0", CpuState::Nice, 7);
        });

        assert_eq!(entries.len(), 1);
        let (kind, name, labels_seen, unit, value) = &entries[0];
        assert_eq!(*kind, MetricKind::Counter);
        assert_eq!(name, "system.cpu.time");
        assert_eq!(*labels_seen, labels(&[("cpu", "cpu0"), ("state", "nice")]));
        assert_eq!(*unit, Some(Unit::Seconds));
        assert_eq!(*value, DebugValue::Counter(7));
    }
}
