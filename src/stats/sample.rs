//! Samples and sample sets
//!
//! A sample set keeps samples in execution order. Statistics do not care about
//! order, but outlier positions do: a spike at index 37 can be matched against
//! whatever else the process was doing at that point.

use std::time::Duration;

use crate::core::error::{HarnessError, Result};

/// One measured duration, in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sample(u64);

impl Sample {
    pub const fn from_nanos(nanos: u64) -> Self {
        Sample(nanos)
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }
}

impl From<Duration> for Sample {
    fn from(duration: Duration) -> Self {
        Sample(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
    }
}

/// Ordered, non-empty collection of samples from one measurement run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Build a sample set from literal nanosecond values, in the given order.
    pub fn from_nanos(nanos: Vec<u64>) -> Result<Self> {
        if nanos.is_empty() {
            return Err(HarnessError::invalid("sample set must contain at least one sample"));
        }
        Ok(Self {
            samples: nanos.into_iter().map(Sample::from_nanos).collect(),
        })
    }

    /// Only the harness builds sets incrementally, and it never hands out an empty one.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.samples.iter().copied()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    /// Nanosecond values in execution order
    pub fn to_nanos(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.as_nanos()).collect()
    }

    /// Nanosecond values sorted ascending
    pub fn sorted_nanos(&self) -> Vec<u64> {
        let mut sorted = self.to_nanos();
        sorted.sort_unstable();
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_rejected() {
        let err = SampleSet::from_nanos(Vec::new()).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidConfiguration(_)));
    }

    #[test]
    fn keeps_execution_order() {
        let set = SampleSet::from_nanos(vec![30, 10, 20]).unwrap();
        assert_eq!(set.to_nanos(), vec![30, 10, 20]);
        assert_eq!(set.sorted_nanos(), vec![10, 20, 30]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn duration_conversion_saturates() {
        assert_eq!(Sample::from(Duration::from_micros(3)).as_nanos(), 3_000);
        assert_eq!(Sample::from(Duration::MAX).as_nanos(), u64::MAX);
    }
}
