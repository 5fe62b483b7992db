//! CSV output generation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;
use tracing::debug;

use labs_model::{CellValue, FLAG_COLUMN, Flag, LabTable, SummaryRow, format_numeric};

const SUMMARY_HEADER: [&str; 6] = ["group_type", "group_value", "count", "mean", "min", "max"];

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

fn open_writer(path: &Path) -> Result<Writer<fs::File>> {
    ensure_parent_dir(path)?;
    Writer::from_path(path).with_context(|| format!("create {}", path.display()))
}

/// Write a table with a header row. Missing cells are written empty.
pub fn write_table_csv(path: &Path, table: &LabTable) -> Result<()> {
    let mut writer = open_writer(path)?;
    writer
        .write_record(&table.columns)
        .with_context(|| format!("write header to {}", path.display()))?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(CellValue::to_string))
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    debug!(path = %path.display(), rows = table.height(), "table written");
    Ok(())
}

/// Rows flagged LOW or HIGH, same columns. Empty when there is no flag column.
pub fn flagged_only(table: &LabTable) -> LabTable {
    let Some(flag_index) = table.column_index(FLAG_COLUMN) else {
        return LabTable::new(table.columns.clone());
    };
    table.filter_rows(|row| {
        row[flag_index]
            .as_text()
            .and_then(|text| text.parse::<Flag>().ok())
            .is_some_and(|flag| flag.is_out_of_range())
    })
}

fn optional_number(value: Option<f64>) -> String {
    value.map(format_numeric).unwrap_or_default()
}

/// Write the summary table (`group_type,group_value,count,mean,min,max`).
pub fn write_summary_csv(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    let mut writer = open_writer(path)?;
    writer
        .write_record(SUMMARY_HEADER)
        .with_context(|| format!("write header to {}", path.display()))?;
    for row in rows {
        writer
            .write_record([
                row.group_type.clone(),
                row.group_value.clone(),
                row.count.to_string(),
                optional_number(row.mean),
                optional_number(row.min),
                optional_number(row.max),
            ])
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    debug!(path = %path.display(), rows = rows.len(), "summary written");
    Ok(())
}
