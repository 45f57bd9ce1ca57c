//! CPU time sampling from `/proc/stat`
//!
//! The file starts with an aggregate `cpu` line, followed by one `cpuN` line
//! per core, followed by other counters (`intr`, `ctxt`, ...):
//!
//! ```text
//! cpu  4705 356 584 3699 23 23 0 0 0 0
//! cpu0 1393 280 463 1012 12 10 0 0 0 0
//! cpu1 3312 76 121 2687 11 13 0 0 0 0
//! intr 114930548 113199788 3 0 5 263 0 4 [...]
//! ```
//!
//! Values are in USER_HZ ticks.

use crate::telemetry;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Kernel clock ticks per second
pub const USER_HZ: u64 = 100;

/// Sampling errors
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("failed to read counters: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed cpu line {line}: {content:?}")]
    Malformed { line: usize, content: String },
}

/// CPU time category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuState {
    User,
    Nice,
    System,
}

impl CpuState {
    /// Column order in `/proc/stat`
    pub const ALL: [CpuState; 3] = [CpuState::User, CpuState::Nice, CpuState::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            CpuState::User => "user",
            CpuState::Nice => "nice",
            CpuState::System => "system",
        }
    }
}

/// One (cpu, state) reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuSample {
    /// Core label, e.g. `cpu0`
    pub cpu: String,
    pub state: CpuState,
    /// Whole seconds, `ticks / USER_HZ`
    pub seconds: u64,
}

/// Parse per-core user, nice and system time
///
/// Skips the first (aggregate) line and stops at the first line that does not
/// start with `cpu`. This relies on the kernel listing every core line
/// contiguously right after the aggregate line; anything after the per-core
/// block is never read.
pub fn parse_cpu_times<R: BufRead>(reader: R) -> Result<Vec<CpuSample>, SamplerError> {
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        if !line.starts_with("cpu") {
            break;
        }

        let malformed = || SamplerError::Malformed {
            line: index + 1,
            content: line.clone(),
        };

        let mut fields = line.split_whitespace();
        let cpu = fields.next().ok_or_else(malformed)?;

        for state in CpuState::ALL {
            let ticks: u64 = fields
                .next()
                .and_then(|f| f.parse().ok())
                .ok_or_else(malformed)?;
            samples.push(CpuSample {
                cpu: cpu.to_string(),
                state,
                seconds: ticks / USER_HZ,
            });
        }
    }

    Ok(samples)
}

/// Collects CPU time from a counter file on demand
#[derive(Debug, Clone)]
pub struct CpuTimeSampler {
    path: PathBuf,
}

impl CpuTimeSampler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the counter file once
    ///
    /// Each call opens its own handle, which is closed before returning.
    pub fn collect(&self) -> Result<Vec<CpuSample>, SamplerError> {
        let file = File::open(&self.path)?;
        parse_cpu_times(BufReader::new(file))
    }

    /// Publish samples as absolute `system.cpu.time` values
    pub fn publish(samples: &[CpuSample]) {
        for sample in samples {
            telemetry::record_cpu_time(&sample.cpu, sample.state, sample.seconds);
        }
    }

    /// Collect and publish, returning what was published
    pub fn observe(&self) -> Result<Vec<CpuSample>, SamplerError> {
        let samples = self.collect()?;
        Self::publish(&samples);
        tracing::debug!(
            path = %self.path.display(),
            samples = samples.len(),
            "CPU time collected"
        );
        Ok(samples)
    }
}
