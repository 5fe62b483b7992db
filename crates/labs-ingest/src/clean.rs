//! Table cleaning: trim, drop empty rows and columns, drop exact duplicates.

use labs_model::{CellValue, LabTable};

/// What cleaning removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub rows_read: usize,
    pub empty_rows_removed: usize,
    pub empty_columns_removed: Vec<String>,
    pub duplicates_removed: usize,
}

/// Builds a clean table from a header and raw rows.
///
/// Cells are trimmed and blank cells become missing. Rows with no value and
/// columns with no value are dropped, then exact duplicate rows are removed
/// keeping the first occurrence. Rows shorter than the header are padded.
pub fn clean_rows(headers: &[String], raw_rows: &[Vec<String>]) -> (LabTable, CleanStats) {
    let mut stats = CleanStats {
        rows_read: raw_rows.len(),
        ..CleanStats::default()
    };

    let mut table = LabTable::new(headers.to_vec());
    for raw in raw_rows {
        let row: Vec<CellValue> = raw.iter().map(|cell| CellValue::from_raw(cell)).collect();
        if row.iter().all(CellValue::is_missing) {
            stats.empty_rows_removed += 1;
            continue;
        }
        table.push_row(row);
    }

    stats.empty_columns_removed = table.drop_empty_columns(|_| true);
    stats.duplicates_removed = table.dedup_rows();

    (table, stats)
}
