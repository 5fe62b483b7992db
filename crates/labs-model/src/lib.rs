//! Shared data model for the lab results pipeline.
//!
//! - **cell / table**: the in-memory rectangular dataset and its cell values
//! - **role**: canonical column roles and the resolved column mapping
//! - **range**: reference-range entries (unisex or sex-keyed) and the range table
//! - **flag**: per-record range check outcome
//! - **summary**: aggregated summary rows

pub mod cell;
pub mod flag;
pub mod lookup;
pub mod range;
pub mod role;
pub mod summary;
pub mod table;

pub use cell::{CellValue, format_numeric, parse_finite_f64};
pub use flag::{Flag, RangeCheck, UnknownReason};
pub use lookup::CaseInsensitiveSet;
pub use range::{RangeEntry, RangeTable, ReferenceRange, Sex, SexRanges};
pub use role::{ColumnMapping, Role};
pub use summary::{MISSING_GROUP_VALUE, OVERALL_GROUP_TYPE, OVERALL_GROUP_VALUE, SummaryRow};
pub use table::LabTable;

/// Derived column holding the applied lower bound.
pub const REF_LOW_COLUMN: &str = "ref_low";
/// Derived column holding the applied upper bound.
pub const REF_HIGH_COLUMN: &str = "ref_high";
/// Derived column holding the applied range units.
pub const REF_UNITS_COLUMN: &str = "ref_units";
/// Derived column holding the range check flag.
pub const FLAG_COLUMN: &str = "flag";

/// All columns appended by the range flagger, in output order.
pub const DERIVED_COLUMNS: [&str; 4] = [
    REF_LOW_COLUMN,
    REF_HIGH_COLUMN,
    REF_UNITS_COLUMN,
    FLAG_COLUMN,
];
