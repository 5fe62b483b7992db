//! Schema normalization: resolve column roles, normalize date-like columns
//! to ISO dates and coerce the value column to numbers.

use tracing::debug;

use labs_map::{find_date_columns, infer_mapping};
use labs_model::{CellValue, ColumnMapping, LabTable, Role};

use crate::normalization::{coerce_numeric, normalize_date};

/// Outcome of schema normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSchema {
    pub mapping: ColumnMapping,
    /// Columns normalized as dates, in header order then the `date` role.
    pub date_columns: Vec<String>,
    /// Non-missing date cells that did not parse and were cleared.
    pub dates_unparsed: usize,
    /// Non-missing value cells that were not numeric and were cleared.
    pub values_unparsed: usize,
    /// Normalized columns left with no value, dropped along with any role
    /// they resolved.
    pub columns_removed: Vec<String>,
    /// Rows that became exact duplicates once normalized.
    pub duplicates_removed: usize,
}

/// Resolves column roles and normalizes the table in place.
///
/// Date-like columns become `YYYY-MM-DD` text; cells that do not parse become
/// missing rather than keeping their original text. The resolved value column
/// becomes numeric, with non-numeric cells missing. Neither step fails.
///
/// Normalization can leave a column with no value or make two rows equal
/// (`13.0` and `13`, `01/15/2024` and `2024-01-15`). Such columns are dropped
/// and their role unresolved, and the later duplicate rows are removed, so the
/// table keeps the loader's no-empty-column and no-duplicate guarantees.
pub fn normalize_schema(table: &mut LabTable) -> NormalizedSchema {
    let mut mapping = infer_mapping(&table.columns);
    let mut date_columns = find_date_columns(&table.columns, &mapping);

    let mut dates_unparsed = 0usize;
    for column in &date_columns {
        let Some(index) = table.column_index(column) else {
            continue;
        };
        for row in &mut table.rows {
            let cell = &mut row[index];
            if cell.is_missing() {
                continue;
            }
            let normalized = normalize_date(&cell.to_string());
            *cell = match normalized {
                Some(iso) => CellValue::Text(iso),
                None => {
                    dates_unparsed += 1;
                    CellValue::Missing
                }
            };
        }
    }

    let mut values_unparsed = 0usize;
    let value_column = mapping.get(Role::Value).map(str::to_string);
    if let Some(index) = value_column.as_deref().and_then(|name| table.column_index(name)) {
        for row in &mut table.rows {
            let cell = &mut row[index];
            let coerced = coerce_numeric(cell);
            if coerced.is_missing() && !cell.is_missing() {
                values_unparsed += 1;
            }
            *cell = coerced;
        }
    }

    let columns_removed = table.drop_empty_columns(|name| {
        date_columns.iter().any(|column| column == name) || value_column.as_deref() == Some(name)
    });
    for column in &columns_removed {
        mapping.clear_column(column);
    }
    date_columns.retain(|column| !columns_removed.contains(column));
    let duplicates_removed = table.dedup_rows();

    for (role, column) in mapping.entries() {
        debug!(role = %role, column = column.unwrap_or("-"), "column mapping");
    }
    debug!(
        resolved_roles = mapping.entries().filter(|(_, column)| column.is_some()).count(),
        date_columns = date_columns.len(),
        dates_unparsed,
        values_unparsed,
        columns_removed = ?columns_removed,
        duplicates_removed,
        "schema normalized"
    );

    NormalizedSchema {
        mapping,
        date_columns,
        dates_unparsed,
        values_unparsed,
        columns_removed,
        duplicates_removed,
    }
}
