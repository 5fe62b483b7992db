#![deny(unsafe_code)]

pub mod error;
pub mod loaders;

pub use crate::error::StandardsError;
pub use crate::loaders::{
    load_default_reference_ranges, load_reference_ranges, parse_reference_ranges,
};
