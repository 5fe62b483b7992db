use std::sync::LazyLock;

use regex::Regex;

use labs_model::{ColumnMapping, Role};

/// Column names treated as date-like regardless of role resolution.
static DATE_COLUMN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(date|collection_date|draw_date|result_date|reported_date)\b")
        .expect("Invalid date column regex")
});

/// True when a column name contains a date keyword as a whole word.
pub fn is_date_like(column: &str) -> bool {
    DATE_COLUMN_REGEX.is_match(column)
}

/// Date-like columns in header order, plus the resolved `date` role column
/// when the name pattern missed it. No column is listed twice.
pub fn find_date_columns<S: AsRef<str>>(headers: &[S], mapping: &ColumnMapping) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for header in headers {
        let header = header.as_ref();
        if is_date_like(header) && !columns.iter().any(|seen| seen == header) {
            columns.push(header.to_string());
        }
    }
    if let Some(date_column) = mapping.get(Role::Date) {
        if !columns.iter().any(|seen| seen == date_column) {
            columns.push(date_column.to_string());
        }
    }
    columns
}
