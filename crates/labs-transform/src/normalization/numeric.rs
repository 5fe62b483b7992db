//! Numeric normalization utilities.

use labs_model::{CellValue, parse_finite_f64};

/// Coerces a cell to a number. Anything that is not a finite number becomes
/// missing; this never fails.
pub fn coerce_numeric(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Number(value) if value.is_finite() => CellValue::Number(*value),
        CellValue::Number(_) | CellValue::Missing => CellValue::Missing,
        CellValue::Text(text) => parse_finite_f64(text).map_or(CellValue::Missing, CellValue::Number),
    }
}
