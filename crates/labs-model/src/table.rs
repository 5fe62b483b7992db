use std::collections::HashSet;

use crate::cell::CellValue;

/// Rectangular lab dataset: one header row and one `Vec<CellValue>` per record.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl LabTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a record, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&CellValue::Missing)
    }

    /// Iterates the cells of one column in row order.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&CellValue::Missing))
    }

    /// Replaces the values of an existing column, or appends a new column.
    ///
    /// `values` shorter than the table are padded with missing cells.
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) {
        let index = match self.column_index(name) {
            Some(index) => index,
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(CellValue::Missing);
                }
                self.columns.len() - 1
            }
        };
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row[index] = values.next().unwrap_or_default();
        }
    }

    /// Removes columns that hold no value, limited to those `eligible` accepts.
    /// Returns the removed names in header order.
    pub fn drop_empty_columns<F>(&mut self, mut eligible: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let empty: Vec<usize> = (0..self.width())
            .filter(|&idx| eligible(&self.columns[idx]))
            .filter(|&idx| self.column_values(idx).all(CellValue::is_missing))
            .collect();
        for &idx in empty.iter().rev() {
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
        let mut removed = Vec::with_capacity(empty.len());
        for idx in empty.into_iter().rev() {
            removed.push(self.columns.remove(idx));
        }
        removed.reverse();
        removed
    }

    /// Removes exact duplicate rows, keeping the first occurrence.
    ///
    /// Cells compare by their text form, so `Number(13.0)` equals `Text("13")`.
    pub fn dedup_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(before);
        self.rows
            .retain(|row| seen.insert(row.iter().map(CellValue::as_text).collect()));
        before - self.rows.len()
    }

    /// Keeps only the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> LabTable
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        LabTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LabTable {
        let mut table = LabTable::new(vec!["test".to_string(), "value".to_string()]);
        table.push_row(vec![CellValue::from("HGB"), CellValue::from("13.0")]);
        table.push_row(vec![CellValue::from("WBC")]);
        table
    }

    #[test]
    fn push_row_pads_to_width() {
        let table = sample();
        assert_eq!(table.rows[1].len(), 2);
        assert!(table.cell(1, 1).is_missing());
    }

    #[test]
    fn set_column_appends_then_replaces_in_place() {
        let mut table = sample();
        table.set_column("flag", vec![CellValue::from("LOW")]);
        assert_eq!(table.columns, vec!["test", "value", "flag"]);
        assert_eq!(table.cell(0, 2), &CellValue::from("LOW"));
        assert!(table.cell(1, 2).is_missing());

        table.set_column("test", vec![CellValue::from("A"), CellValue::from("B")]);
        assert_eq!(table.columns, vec!["test", "value", "flag"]);
        assert_eq!(table.cell(1, 0), &CellValue::from("B"));
    }

    #[test]
    fn drops_only_eligible_empty_columns() {
        let mut table = LabTable::new(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        table.push_row(vec![CellValue::from("x"), CellValue::Missing, CellValue::Missing]);
        table.push_row(vec![CellValue::from("y")]);
        let removed = table.drop_empty_columns(|name| name != "c");
        assert_eq!(removed, vec!["b", "d"]);
        assert_eq!(table.columns, vec!["a", "c"]);
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn dedup_compares_numbers_by_text() {
        let mut table = LabTable::new(vec!["test".into(), "value".into()]);
        table.push_row(vec![CellValue::from("HGB"), CellValue::Number(13.0)]);
        table.push_row(vec![CellValue::from("HGB"), CellValue::from("13")]);
        table.push_row(vec![CellValue::from("GLU"), CellValue::Number(13.0)]);
        assert_eq!(table.dedup_rows(), 1);
        assert_eq!(table.height(), 2);
        assert_eq!(table.cell(1, 0), &CellValue::from("GLU"));
    }
}
