//! Terminal and image presentation of results

pub mod plot;
pub mod report;
