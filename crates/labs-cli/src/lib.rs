//! CLI library components for the lab results analyzer.

pub mod logging;
pub mod pipeline;
pub mod types;
