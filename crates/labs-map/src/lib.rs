#![deny(unsafe_code)]

//! Resolves canonical column roles against an input header.
//!
//! Matching is case-insensitive and walks each role's candidate list in
//! priority order; the first candidate present in the header wins.

pub mod dates;
pub mod infer;

pub use dates::{find_date_columns, is_date_like};
pub use infer::{infer_column, infer_mapping, resolve_group_column};
