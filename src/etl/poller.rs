//! Timed ETL driver

use super::{EtlError, Pipeline};
use crate::quote::StoredQuote;
use std::future::Future;
use std::time::Duration;
use tracing::Instrument;

/// Poller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Extracting,
    Validating,
    Loading,
    Sleeping,
    Stopped,
}

/// Runs the pipeline, sleeping a fixed interval after each cycle
///
/// The interval is added after the cycle finishes; a slow cycle pushes every
/// later cycle back. Shutdown is observed both while sleeping and while a
/// cycle is in flight.
pub struct Poller {
    pipeline: Pipeline,
    interval: Duration,
    max_cycles: Option<u64>,
    state: PollerState,
    cycles: u64,
}

impl Poller {
    pub fn new(pipeline: Pipeline, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            max_cycles: None,
            state: PollerState::Idle,
            cycles: 0,
        }
    }

    /// Stop after `n` completed cycles
    pub fn max_cycles(mut self, n: u64) -> Self {
        self.max_cycles = Some(n);
        self
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    /// Completed cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn transition(&mut self, next: PollerState) {
        tracing::trace!(from = ?self.state, to = ?next, "Poller state change");
        self.state = next;
    }

    /// Run one cycle, tracking the stage in [`PollerState`]
    async fn cycle(&mut self) -> Result<StoredQuote, EtlError> {
        self.transition(PollerState::Extracting);
        let raw = self.pipeline.extract().await?;

        self.transition(PollerState::Validating);
        let quote = self.pipeline.transform(raw)?;

        self.transition(PollerState::Loading);
        let stored = self.pipeline.load(&quote).await?;

        self.transition(PollerState::Idle);
        Ok(stored)
    }

    fn limit_reached(&self) -> bool {
        self.max_cycles.is_some_and(|max| self.cycles >= max)
    }

    fn stop(&mut self, reason: &str) -> u64 {
        tracing::info!(cycles = self.cycles, "{}", reason);
        self.transition(PollerState::Stopped);
        self.cycles
    }

    /// Poll until `shutdown` resolves, `max_cycles` is reached, or a cycle
    /// fails
    ///
    /// A shutdown during a cycle abandons it; an open transaction is rolled
    /// back when the cycle is dropped. Returns the number of completed cycles.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<u64, EtlError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            max_cycles = ?self.max_cycles,
            "Poller started"
        );

        loop {
            if self.limit_reached() {
                return Ok(self.stop("Cycle limit reached"));
            }

            let span = tracing::info_span!("etl_cycle", cycle = self.cycles + 1);
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                result = self.cycle().instrument(span) => Some(result),
            };

            match outcome {
                None => return Ok(self.stop("Interrupt received during cycle, stopping poller")),
                Some(Err(e)) => {
                    // Validation failures are logged by the transform stage
                    if matches!(e, EtlError::Validation(_)) {
                        tracing::debug!(error = %e, cycle = self.cycles + 1, "ETL cycle failed");
                    } else {
                        tracing::error!(error = %e, cycle = self.cycles + 1, "ETL cycle failed");
                    }
                    self.transition(PollerState::Stopped);
                    return Err(e);
                }
                Some(Ok(_)) => self.cycles += 1,
            }

            if self.limit_reached() {
                return Ok(self.stop("Cycle limit reached"));
            }

            self.transition(PollerState::Sleeping);
            tokio::select! {
                _ = &mut shutdown => {
                    return Ok(self.stop("Interrupt received, stopping poller"));
                }
                _ = tokio::time::sleep(self.interval) => {
                    self.transition(PollerState::Idle);
                }
            }
        }
    }
}
