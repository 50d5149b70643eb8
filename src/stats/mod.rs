//! Samples and the statistics derived from them

pub mod measurement;
pub mod sample;
pub mod statistics;
