//! Error types for the measurement harness
//!
//! Every failure propagates to the immediate caller. A failed run produces no
//! statistics at all, so there is no partial-result variant here.

use std::fmt;

use thiserror::Error;

use crate::stats::statistics::Degeneracy;

/// Phase of a harness run in which the operation under test was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Warmup,
    Measurement,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Warmup => f.write_str("warmup"),
            Phase::Measurement => f.write_str("measurement"),
        }
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    /// Iteration count below 1, or an empty sample set.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The operation under test failed. `source` is the operation's own error, untouched.
    #[error("operation failed during {phase} at iteration {iteration}: {source}")]
    OperationFailure {
        phase: Phase,
        iteration: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Advisory: quartile and outlier figures carry no statistical meaning.
    #[error("degenerate statistics: {0}")]
    DegenerateStatistics(Degeneracy),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("plot error: {0}")]
    Plot(String),
}

impl HarnessError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        HarnessError::InvalidConfiguration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
