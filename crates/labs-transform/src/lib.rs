//! Lab results transformation stages.
//!
//! - **normalization**: lenient date parsing and numeric coercion of cells
//! - **schema**: role inference plus date/value normalization of a table
//! - **flag**: sex-aware reference-range lookup and LOW/HIGH/NORMAL/UNKNOWN flags
//! - **summary**: overall and grouped count/mean/min/max statistics

pub mod flag;
pub mod normalization;
pub mod schema;
pub mod summary;

pub use flag::{
    FlagReport, apply_reference_ranges, check_value, classify, normalize_sex, resolve_range,
};
pub use schema::{NormalizedSchema, normalize_schema};
pub use summary::summarize;
