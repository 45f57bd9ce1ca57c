//! Stage timing measurements

use crate::telemetry;
use std::sync::Mutex;
use std::time::Instant;

/// ETL pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Transform,
    Load,
}

impl Stage {
    /// Label value used on the `stage_duration` histogram
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Transform => "transform",
            Stage::Load => "load",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall-clock duration of one stage run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTiming {
    pub stage: Stage,
    pub duration_ms: f64,
}

impl StageTiming {
    /// Measure from `start` until now
    pub fn since(stage: Stage, start: Instant) -> Self {
        Self {
            stage,
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

/// Destination for stage timings
pub trait TimingSink: Send + Sync {
    fn record(&self, timing: StageTiming);
}

/// Records timings to the `stage_duration` histogram
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsSink;

impl TimingSink for MetricsSink {
    fn record(&self, timing: StageTiming) {
        tracing::debug!(
            stage = %timing.stage,
            duration_ms = timing.duration_ms,
            "Stage completed"
        );
        telemetry::record_stage_duration(timing.stage, timing.duration_ms);
    }
}

/// Keeps timings in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    timings: Mutex<Vec<StageTiming>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn timings(&self) -> Vec<StageTiming> {
        self.timings
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// Number of timings recorded for `stage`
    pub fn count(&self, stage: Stage) -> usize {
        self.timings().iter().filter(|t| t.stage == stage).count()
    }
}

impl TimingSink for MemorySink {
    fn record(&self, timing: StageTiming) {
        if let Ok(mut timings) = self.timings.lock() {
            timings.push(timing);
        }
    }
}
