//! Labelled measurement: raw samples plus their statistics

use crate::stats::sample::SampleSet;
use crate::stats::statistics::Statistics;

#[derive(Debug, Clone)]
pub struct Measurement {
    pub label: String,
    pub statistics: Statistics,
    pub raw_samples: SampleSet,
}

impl Measurement {
    pub fn new(label: impl Into<String>, raw_samples: SampleSet) -> Self {
        let statistics = Statistics::from_samples(&raw_samples);
        Self {
            label: label.into(),
            statistics,
            raw_samples,
        }
    }

    /// File-name friendly form of the label
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.label.len());
        for c in self.label.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        slug.trim_matches('_').to_string()
    }
}
