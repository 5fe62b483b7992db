//! Integration tests for CSV and chart outputs.

use std::fs;

use labs_model::{CellValue, ColumnMapping, LabTable, Role, SummaryRow};
use labs_report::{flagged_only, write_histograms, write_summary_csv, write_table_csv};

fn flagged_table() -> LabTable {
    let mut table = LabTable::new(
        ["patient_id", "test", "value", "ref_low", "ref_high", "ref_units", "flag"]
            .map(String::from)
            .to_vec(),
    );
    table.push_row(vec![
        CellValue::from("P1"),
        CellValue::from("GLU"),
        CellValue::Number(65.0),
        CellValue::Number(70.0),
        CellValue::Number(99.0),
        CellValue::from("mg/dL"),
        CellValue::from("LOW"),
    ]);
    table.push_row(vec![
        CellValue::from("P2"),
        CellValue::from("GLU"),
        CellValue::Number(85.5),
        CellValue::Number(70.0),
        CellValue::Number(99.0),
        CellValue::from("mg/dL"),
        CellValue::from("NORMAL"),
    ]);
    table.push_row(vec![
        CellValue::from("P3"),
        CellValue::from("Na, serum"),
        CellValue::Missing,
        CellValue::Missing,
        CellValue::Missing,
        CellValue::Missing,
        CellValue::from("UNKNOWN"),
    ]);
    table
}

#[test]
fn writes_table_with_empty_missing_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cleaned_labs.csv");
    write_table_csv(&path, &flagged_table()).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(contents.trim_end(), @r#"
    patient_id,test,value,ref_low,ref_high,ref_units,flag
    P1,GLU,65,70,99,mg/dL,LOW
    P2,GLU,85.5,70,99,mg/dL,NORMAL
    P3,"Na, serum",,,,,UNKNOWN
    "#);
}

#[test]
fn writes_flagged_subset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flags_labs.csv");
    write_table_csv(&path, &flagged_only(&flagged_table())).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(contents.trim_end(), @r"
    patient_id,test,value,ref_low,ref_high,ref_units,flag
    P1,GLU,65,70,99,mg/dL,LOW
    ");
}

#[test]
fn writes_summary_with_empty_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary_labs.csv");
    let rows = vec![
        SummaryRow {
            group_type: "overall".to_string(),
            group_value: "ALL".to_string(),
            count: 3,
            mean: Some(75.25),
            min: Some(65.0),
            max: Some(85.5),
        },
        SummaryRow {
            group_type: "test".to_string(),
            group_value: "Na, serum".to_string(),
            count: 1,
            mean: None,
            min: None,
            max: None,
        },
    ];
    write_summary_csv(&path, &rows).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(contents.trim_end(), @r#"
    group_type,group_value,count,mean,min,max
    overall,ALL,3,75.25,65,85.5
    test,"Na, serum",1,,,
    "#);
}

#[test]
fn writes_one_chart_per_test_with_values() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("outputs");
    let mapping = ColumnMapping::new()
        .with(Role::TestName, "test")
        .with(Role::Value, "value");

    let paths = write_histograms(&flagged_table(), &mapping, &out_dir).unwrap();

    assert_eq!(paths, vec![out_dir.join("GLU_hist.png")]);
    let img = image::open(&paths[0]).unwrap();
    assert_eq!((img.width(), img.height()), (980, 560));
}

#[test]
fn charts_skipped_without_value_column() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("outputs");
    let mapping = ColumnMapping::new().with(Role::TestName, "test");

    let paths = write_histograms(&flagged_table(), &mapping, &out_dir).unwrap();

    assert!(paths.is_empty());
    assert!(!out_dir.exists());
}

#[test]
fn colliding_chart_names_keep_the_first_test() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("outputs");
    let mut table = LabTable::new(vec!["test".to_string(), "value".to_string()]);
    for (test, value) in [("Na/K", "30"), ("Na K", "31"), ("GLU", "85")] {
        table.push_row(vec![CellValue::from(test), CellValue::from(value)]);
    }
    let mapping = ColumnMapping::new()
        .with(Role::TestName, "test")
        .with(Role::Value, "value");

    let paths = write_histograms(&table, &mapping, &out_dir).unwrap();

    assert_eq!(
        paths,
        vec![out_dir.join("GLU_hist.png"), out_dir.join("Na_K_hist.png")]
    );
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 2);
}
