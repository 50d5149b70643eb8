//! Measurement harness
//!
//! Runs an operation repeatedly on the calling thread, timing each call with a
//! monotonic clock. The harness holds no state besides its clock: every run
//! builds a fresh sample set and hands it back to the caller.
//!
//! Operations return `Result<T, E>`. The first `Err` aborts the phase and no
//! samples are returned. Infallible payloads return `Ok::<_, Infallible>(x)`.
//!
//! The harness passes each `Ok` value through [`std::hint::black_box`], but
//! that only keeps the final value alive. Work whose result is discarded
//! inside the operation can still be removed by the optimizer.

use std::hint::black_box;

use crate::core::clock::{Clock, MonotonicClock};
use crate::core::config::HarnessConfig;
use crate::core::error::{HarnessError, Phase, Result};
use crate::stats::sample::SampleSet;
use crate::stats::statistics::{self, Statistics};

#[derive(Debug, Clone, Default)]
pub struct Harness<C: Clock = MonotonicClock> {
    clock: C,
}

impl Harness<MonotonicClock> {
    pub fn new() -> Self {
        Self { clock: MonotonicClock }
    }
}

impl<C: Clock> Harness<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Invoke `operation` `iterations` times without timing it.
    pub fn warmup<F, T, E>(&self, mut operation: F, iterations: usize) -> Result<()>
    where
        F: FnMut() -> std::result::Result<T, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        if iterations < 1 {
            return Err(HarnessError::invalid("warmup iterations must be at least 1"));
        }
        tracing::debug!(iterations, "warmup started");
        for iteration in 0..iterations {
            let value = operation().map_err(|e| failure(Phase::Warmup, iteration, e))?;
            black_box(value);
        }
        tracing::debug!(iterations, "warmup finished");
        Ok(())
    }

    /// Invoke `operation` exactly `iterations` times, recording one sample per call.
    ///
    /// Samples can be zero when the operation is faster than the clock ticks.
    /// They are returned as measured.
    pub fn measure<F, T, E>(&self, mut operation: F, iterations: usize) -> Result<SampleSet>
    where
        F: FnMut() -> std::result::Result<T, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        if iterations < 1 {
            return Err(HarnessError::invalid("measured iterations must be at least 1"));
        }
        tracing::debug!(iterations, "measurement started");
        let mut samples = SampleSet::with_capacity(iterations);
        for iteration in 0..iterations {
            let start = self.clock.now();
            let outcome = operation();
            let end = self.clock.now();
            let value = outcome.map_err(|e| failure(Phase::Measurement, iteration, e))?;
            black_box(value);
            samples.push(self.clock.between(start, end));
        }
        tracing::debug!(samples = samples.len(), "measurement finished");
        Ok(samples)
    }

    pub fn summarize(&self, samples: &SampleSet) -> Statistics {
        statistics::summarize(samples)
    }

    /// Warmup, measurement and summary in one call.
    pub fn run_full<F, T, E>(
        &self,
        mut operation: F,
        warmup_iterations: usize,
        measured_iterations: usize,
    ) -> Result<Statistics>
    where
        F: FnMut() -> std::result::Result<T, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        // Validate both counts before the operation runs even once.
        if measured_iterations < 1 {
            return Err(HarnessError::invalid("measured iterations must be at least 1"));
        }
        self.warmup(&mut operation, warmup_iterations)?;
        let samples = self.measure(&mut operation, measured_iterations)?;
        Ok(self.summarize(&samples))
    }

    /// [`Harness::run_full`] driven by a config, also returning the raw samples.
    pub fn run<F, T, E>(&self, config: &HarnessConfig, mut operation: F) -> Result<(SampleSet, Statistics)>
    where
        F: FnMut() -> std::result::Result<T, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.warmup(&mut operation, config.warmup_iterations())?;
        let samples = self.measure(&mut operation, config.measured_iterations())?;
        let stats = self.summarize(&samples);
        Ok((samples, stats))
    }
}

fn failure<E>(phase: Phase, iteration: usize, source: E) -> HarnessError
where
    E: std::error::Error + Send + Sync + 'static,
{
    tracing::warn!(%phase, iteration, error = %source, "operation failed, aborting run");
    HarnessError::OperationFailure {
        phase,
        iteration,
        source: Box::new(source),
    }
}
