//! Timing Lab
//!
//! A small measurement harness (warmup, monotonic timing, descriptive
//! statistics with Tukey outliers) and a set of demos showing the classic
//! timing pitfalls it guards against.

pub mod core;
pub mod stats;
pub mod ui;
pub mod utils;

pub use crate::core::clock::{Clock, MonotonicClock};
pub use crate::core::config::HarnessConfig;
pub use crate::core::error::{HarnessError, Phase, Result};
pub use crate::core::harness::Harness;
pub use crate::core::run_demos;
pub use crate::stats::sample::{Sample, SampleSet};
pub use crate::stats::statistics::{summarize, Degeneracy, Statistics, Variability};
