//! Output sinks for analyzed lab results.
//!
//! - **CSV**: cleaned table, flagged-only subset and summary table
//! - **Charts**: one value histogram (PNG) per test

mod chart;
mod csv_writer;
mod paths;

pub use chart::{Histogram, render_histogram, sanitize_file_stem, write_histograms};
pub use csv_writer::{flagged_only, write_summary_csv, write_table_csv};
pub use paths::{OutputPaths, default_output_paths};
