//! Descriptive statistics over a sample set
//!
//! Ranks are picked by integer division (`n/4`, `n/2`, `3n/4` on the sorted
//! samples) with no interpolation between neighbours. Population standard
//! deviation, Tukey fences at 1.5 IQR.

use std::fmt;

use serde::Serialize;

use crate::core::error::{HarnessError, Result};
use crate::stats::sample::SampleSet;

/// Coefficient of variation above which a run is considered disturbed.
pub const HIGH_VARIABILITY_CV: f64 = 0.20;

const TUKEY_K: f64 = 1.5;

/// Why a set of statistics is not statistically meaningful
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    SingleSample,
    ZeroMean,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degeneracy::SingleSample => f.write_str("only one sample, quartiles and spread are trivial"),
            Degeneracy::ZeroMean => f.write_str("mean is zero, operation is below clock resolution"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variability {
    Stable,
    High,
}

/// Summary of one sample set. All durations are nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub mean: f64,
    pub median: u64,
    pub min: u64,
    pub max: u64,
    pub q1: u64,
    pub q3: u64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    pub outlier_count: usize,
    /// Execution-order positions of the flagged samples
    pub outlier_indices: Vec<usize>,
}

impl Statistics {
    pub fn from_samples(samples: &SampleSet) -> Self {
        let sorted = samples.sorted_nanos();
        let n = sorted.len();

        let median = sorted[n / 2];
        let q1 = sorted[n / 4];
        let q3 = sorted[3 * n / 4];

        let total: u128 = sorted.iter().map(|&x| u128::from(x)).sum();
        let mean = total as f64 / n as f64;

        let variance = sorted
            .iter()
            .map(|&x| (x as f64 - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        let std_dev = variance.sqrt();

        let coefficient_of_variation = if mean == 0.0 { 0.0 } else { std_dev / mean };

        let iqr = (q3 - q1) as f64;
        let lower = q1 as f64 - TUKEY_K * iqr;
        let upper = q3 as f64 + TUKEY_K * iqr;
        let outlier_indices: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter(|(_, s)| {
                let x = s.as_nanos() as f64;
                x < lower || x > upper
            })
            .map(|(i, _)| i)
            .collect();

        Self {
            count: n,
            mean,
            median,
            min: sorted[0],
            max: sorted[n - 1],
            q1,
            q3,
            std_dev,
            coefficient_of_variation,
            outlier_count: outlier_indices.len(),
            outlier_indices,
        }
    }

    pub fn iqr(&self) -> u64 {
        self.q3 - self.q1
    }

    pub fn lower_fence(&self) -> f64 {
        self.q1 as f64 - TUKEY_K * self.iqr() as f64
    }

    pub fn upper_fence(&self) -> f64 {
        self.q3 as f64 + TUKEY_K * self.iqr() as f64
    }

    pub fn is_outlier(&self, nanos: u64) -> bool {
        let x = nanos as f64;
        x < self.lower_fence() || x > self.upper_fence()
    }

    pub fn outlier_ratio(&self) -> f64 {
        self.outlier_count as f64 / self.count as f64
    }

    pub fn degeneracy(&self) -> Option<Degeneracy> {
        if self.count == 1 {
            Some(Degeneracy::SingleSample)
        } else if self.mean == 0.0 {
            Some(Degeneracy::ZeroMean)
        } else {
            None
        }
    }

    /// Turn the degeneracy advisory into an error, for callers that cannot use trivial figures.
    pub fn ensure_meaningful(&self) -> Result<&Self> {
        match self.degeneracy() {
            Some(d) => Err(HarnessError::DegenerateStatistics(d)),
            None => Ok(self),
        }
    }

    pub fn variability(&self) -> Variability {
        if self.coefficient_of_variation > HIGH_VARIABILITY_CV {
            Variability::High
        } else {
            Variability::Stable
        }
    }
}

/// Pure summary of a sample set.
pub fn summarize(samples: &SampleSet) -> Statistics {
    Statistics::from_samples(samples)
}
