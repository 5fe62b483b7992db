use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use labs_model::LabTable;

use crate::clean::{CleanStats, clean_rows};
use crate::error::IngestError;

/// A cleaned table plus what cleaning removed.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: LabTable,
    pub stats: CleanStats,
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn is_csv_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn map_csv_error(path: &Path, error: csv::Error) -> IngestError {
    let line = error.position().map(csv::Position::line);
    match error.into_kind() {
        csv::ErrorKind::Io(source) => IngestError::Io {
            path: path.to_path_buf(),
            source,
        },
        csv::ErrorKind::Utf8 { .. } => IngestError::format(path, "input is not valid UTF-8 text"),
        other => {
            let message = match line {
                Some(line) => format!("malformed CSV at line {line}: {other:?}"),
                None => format!("malformed CSV: {other:?}"),
            };
            IngestError::format(path, message)
        }
    }
}

/// Reads a comma-separated lab results file with a header row and cleans it.
///
/// # Errors
///
/// - `NotFound` when `path` does not exist.
/// - `Format` when the file is not a `.csv`, has no header row, is not valid
///   UTF-8, or has a data row wider than the header.
pub fn read_lab_csv(path: &Path) -> Result<LoadReport, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound {
            path: path.to_path_buf(),
        });
    }
    if !is_csv_path(path) {
        return Err(IngestError::format(
            path,
            "expected a .csv file (e.g. sample_labs.csv)",
        ));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|error| map_csv_error(path, error))?;

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|error| map_csv_error(path, error))?
            .iter()
            .map(normalize_header)
            .collect(),
        None => return Err(IngestError::format(path, "file has no header row")),
    };

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in records {
        let record = record.map_err(|error| map_csv_error(path, error))?;
        if record.len() > headers.len() {
            let line = record.position().map_or(0, csv::Position::line);
            return Err(IngestError::format(
                path,
                format!(
                    "line {line} has {} fields, header has {}",
                    record.len(),
                    headers.len()
                ),
            ));
        }
        raw_rows.push(record.iter().map(str::to_string).collect());
    }
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = raw_rows.len(),
        "read csv"
    );

    let (table, stats) = clean_rows(&headers, &raw_rows);
    if stats.duplicates_removed > 0 {
        info!(
            duplicates_removed = stats.duplicates_removed,
            "removed duplicate rows"
        );
    }
    if !stats.empty_columns_removed.is_empty() {
        debug!(columns = ?stats.empty_columns_removed, "dropped empty columns");
    }
    Ok(LoadReport { table, stats })
}
