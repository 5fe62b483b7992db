//! Tests for reference-range flagging.

use labs_model::{
    CellValue, ColumnMapping, Flag, LabTable, RangeEntry, RangeTable, ReferenceRange, Role, Sex,
    UnknownReason,
};
use labs_standards::load_default_reference_ranges;
use labs_transform::{apply_reference_ranges, check_value, classify, normalize_schema};

fn table(columns: &[&str], rows: &[&[&str]]) -> LabTable {
    let mut table = LabTable::new(columns.iter().map(|c| (*c).to_string()).collect());
    for row in rows {
        table.push_row(row.iter().map(|cell| CellValue::from(*cell)).collect());
    }
    table
}

fn column<'a>(table: &'a LabTable, name: &str) -> Vec<&'a CellValue> {
    let index = table.column_index(name).expect("column exists");
    table.column_values(index).collect()
}

#[test]
fn boundary_values_are_normal() {
    let range = ReferenceRange::new(70.0, 99.0, "mg/dL");
    let flags: Vec<Flag> = [69.9, 70.0, 85.0, 99.0, 99.1]
        .into_iter()
        .map(|value| classify(value, &range))
        .collect();
    assert_eq!(
        flags,
        vec![Flag::Low, Flag::Normal, Flag::Normal, Flag::Normal, Flag::High]
    );
}

#[test]
fn hemoglobin_uses_sex_specific_ranges() {
    let ranges = load_default_reference_ranges().expect("default ranges");

    let male = check_value("HGB", Sex::Male, Some(13.0), &ranges);
    assert_eq!(male.flag, Flag::Low);
    assert_eq!(male.range.as_ref().map(|r| (r.low, r.high)), Some((13.5, 17.5)));

    let female = check_value("HGB", Sex::Female, Some(13.0), &ranges);
    assert_eq!(female.flag, Flag::Normal);
    assert_eq!(female.range.as_ref().map(|r| (r.low, r.high)), Some((12.0, 15.5)));

    let unknown = check_value("HGB", Sex::Unknown, Some(13.0), &ranges);
    assert_eq!(unknown.flag, Flag::Normal);
    assert_eq!(unknown.range.as_ref().map(|r| (r.low, r.high)), Some((12.0, 16.0)));
}

#[test]
fn unknown_test_has_no_range() {
    let ranges = load_default_reference_ranges().expect("default ranges");
    let check = check_value("ZZZ", Sex::Male, Some(1.0), &ranges);
    assert_eq!(check.flag, Flag::Unknown);
    assert_eq!(check.unknown_reason, Some(UnknownReason::TestNotInTable));
    assert!(check.range.is_none());
}

#[test]
fn missing_value_is_unknown() {
    let ranges = load_default_reference_ranges().expect("default ranges");
    let check = check_value("GLU", Sex::Unknown, None, &ranges);
    assert_eq!(check.flag, Flag::Unknown);
    assert_eq!(check.unknown_reason, Some(UnknownReason::MissingValue));
    assert!(check.range.is_none());
}

#[test]
fn applies_flags_and_range_columns_to_table() {
    let ranges = load_default_reference_ranges().expect("default ranges");
    let mut table = table(
        &["MRN", "Gender", "Test", "Result", "Units"],
        &[
            &["1", "Male", "hgb", "13.0", "g/dL"],
            &["2", "Female", "HGB", "13.0", "g/dL"],
            &["3", "", " HGB ", "13.0", "g/dL"],
            &["4", "F", "ZZZ", "5", ""],
            &["5", "M", "GLU", "abc", "mg/dL"],
            &["6", "M", "GLU", "120", "mg/dL"],
        ],
    );
    let schema = normalize_schema(&mut table);
    let report = apply_reference_ranges(&mut table, &schema.mapping, &ranges);

    assert!(report.applied);
    assert_eq!(
        table.columns,
        vec!["MRN", "Gender", "Test", "Result", "Units", "ref_low", "ref_high", "ref_units", "flag"]
    );
    let flags: Vec<String> = column(&table, "flag").iter().map(|c| c.to_string()).collect();
    assert_eq!(flags, vec!["LOW", "NORMAL", "NORMAL", "UNKNOWN", "UNKNOWN", "HIGH"]);

    let lows = column(&table, "ref_low");
    assert_eq!(lows[0], &CellValue::Number(13.5));
    assert_eq!(lows[1], &CellValue::Number(12.0));
    assert_eq!(lows[2], &CellValue::Number(12.0));
    assert!(lows[3].is_missing());
    assert!(lows[4].is_missing());
    assert!(column(&table, "ref_units")[3].is_missing());
    assert_eq!(column(&table, "ref_units")[5], &CellValue::from("mg/dL"));

    assert_eq!(report.count(Flag::Unknown), 2);
    assert_eq!(report.out_of_range(), 2);
    assert_eq!(report.unknown_reasons.get(&UnknownReason::TestNotInTable), Some(&1));
    assert_eq!(report.unknown_reasons.get(&UnknownReason::MissingValue), Some(&1));
    assert_eq!(report.covered_tests, vec!["GLU".to_string(), "HGB".to_string()]);
}

#[test]
fn unresolved_columns_mark_everything_unknown() {
    let ranges = load_default_reference_ranges().expect("default ranges");
    let mut table = table(&["Analyte", "comment"], &[&["GLU", "x"], &["HGB", "y"]]);
    let mapping = ColumnMapping::new().with(Role::TestName, "Analyte");
    let report = apply_reference_ranges(&mut table, &mapping, &ranges);

    assert!(!report.applied);
    assert_eq!(report.count(Flag::Unknown), 2);
    assert_eq!(
        report.unknown_reasons.get(&UnknownReason::ColumnsUnresolved),
        Some(&2)
    );
    for cell in column(&table, "flag") {
        assert_eq!(cell, &CellValue::from("UNKNOWN"));
    }
    assert!(column(&table, "ref_low").iter().all(|cell| cell.is_missing()));
}

#[test]
fn existing_flag_columns_are_replaced_in_place() {
    let mut ranges = RangeTable::new();
    ranges.insert("GLU", RangeEntry::Unisex(ReferenceRange::new(70.0, 99.0, "mg/dL")));
    let mut table = table(&["test", "flag", "value"], &[&["GLU", "stale", "50"]]);
    let schema = normalize_schema(&mut table);
    apply_reference_ranges(&mut table, &schema.mapping, &ranges);

    assert_eq!(
        table.columns,
        vec!["test", "flag", "value", "ref_low", "ref_high", "ref_units"]
    );
    assert_eq!(table.cell(0, 1), &CellValue::from("LOW"));
}
