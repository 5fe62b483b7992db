#![deny(unsafe_code)]

pub mod clean;
pub mod csv_table;
pub mod error;

pub use clean::{CleanStats, clean_rows};
pub use csv_table::{LoadReport, read_lab_csv};
pub use error::IngestError;
