//! Cell-level normalization used by the schema normalizer.
//!
//! - **datetime**: lenient calendar-date parsing to `YYYY-MM-DD`
//! - **numeric**: numeric coercion of result values

pub mod datetime;
pub mod numeric;

pub use datetime::{format_iso8601_date, normalize_date, parse_date};
pub use numeric::coerce_numeric;
