//! Overall and grouped summary statistics.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use labs_map::resolve_group_column;
use labs_model::{
    CellValue, ColumnMapping, LabTable, MISSING_GROUP_VALUE, OVERALL_GROUP_TYPE,
    OVERALL_GROUP_VALUE, Role, SummaryRow, parse_finite_f64,
};

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    records: usize,
    numeric: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn push(&mut self, value: Option<f64>) {
        self.records += 1;
        let Some(value) = value else {
            return;
        };
        if self.numeric == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.numeric += 1;
        self.sum += value;
    }

    /// `count_values` counts numeric values instead of records.
    fn into_row(
        self,
        group_type: &str,
        group_value: String,
        numeric: bool,
        count_values: bool,
    ) -> SummaryRow {
        let has_values = numeric && self.numeric > 0;
        SummaryRow {
            group_type: group_type.to_string(),
            group_value,
            count: if numeric && count_values {
                self.numeric
            } else {
                self.records
            },
            mean: has_values.then(|| self.sum / self.numeric as f64),
            min: has_values.then_some(self.min),
            max: has_values.then_some(self.max),
        }
    }
}

/// Builds the summary table: one overall row, then one row per distinct value
/// of each group-by column.
///
/// Group-by keys may be canonical role names or column names; keys resolving
/// to nothing are skipped and duplicates after resolution are dropped. Within
/// a group column, values are ascending (by number when every value is
/// numeric, by text otherwise) and records with no value form a trailing
/// `(missing)` bucket.
///
/// The overall `count` is the number of records. A group's `count` is the
/// number of numeric values it holds, or its number of records when the value
/// column is unresolved. mean/min/max use the numeric cells of the value
/// column and are empty when that column is unresolved.
pub fn summarize(
    table: &LabTable,
    mapping: &ColumnMapping,
    group_by: &[String],
) -> Vec<SummaryRow> {
    let value_index = mapping.get(Role::Value).and_then(|name| table.column_index(name));
    let numeric = value_index.is_some();
    let value_of = |row: &[CellValue]| value_index.and_then(|idx| row[idx].as_f64());

    let mut overall = Accumulator::default();
    for row in &table.rows {
        overall.push(value_of(row));
    }
    let mut rows = vec![overall.into_row(
        OVERALL_GROUP_TYPE,
        OVERALL_GROUP_VALUE.to_string(),
        numeric,
        false,
    )];

    let mut group_columns: Vec<String> = Vec::new();
    for key in group_by {
        match resolve_group_column(key, mapping, &table.columns) {
            Some(column) if !group_columns.contains(&column) => group_columns.push(column),
            Some(column) => debug!(key = %key, column = %column, "duplicate group-by column"),
            None => warn!(key = %key, "group-by field not found; skipping"),
        }
    }

    for column in &group_columns {
        let Some(group_index) = table.column_index(column) else {
            continue;
        };
        let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();
        let mut missing: Option<Accumulator> = None;
        for row in &table.rows {
            let bucket = match row[group_index].as_text() {
                Some(value) => groups.entry(value).or_default(),
                None => missing.get_or_insert_with(Accumulator::default),
            };
            bucket.push(value_of(row));
        }
        debug!(
            column = %column,
            groups = groups.len(),
            has_missing = missing.is_some(),
            "grouped summary"
        );
        for (value, acc) in sorted_groups(groups) {
            rows.push(acc.into_row(column, value, numeric, true));
        }
        if let Some(acc) = missing {
            rows.push(acc.into_row(column, MISSING_GROUP_VALUE.to_string(), numeric, true));
        }
    }

    rows
}

/// Orders groups by numeric value when every key parses as a number. Keys
/// that tie numerically (`13` and `13.0`) keep their text order.
fn sorted_groups(groups: BTreeMap<String, Accumulator>) -> Vec<(String, Accumulator)> {
    let keyed: Option<Vec<(f64, String, Accumulator)>> = groups
        .iter()
        .map(|(value, acc)| parse_finite_f64(value).map(|number| (number, value.clone(), *acc)))
        .collect();
    match keyed {
        Some(mut keyed) => {
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
            keyed.into_iter().map(|(_, value, acc)| (value, acc)).collect()
        }
        None => groups.into_iter().collect(),
    }
}
