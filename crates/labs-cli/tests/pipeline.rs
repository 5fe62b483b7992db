//! End-to-end tests for the analyzer pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use labs_cli::pipeline::run;
use labs_cli::types::RunOptions;
use labs_model::{Flag, Role};

const SAMPLE: &str = "\u{feff}PatientID, Gender ,Test,Result,Units,Collection_Date,Notes\n\
P001,M,HGB,13.0,g/dL,01/15/2024,\n\
P002,F,HGB,13.0,g/dL,2024-01-16,\n\
P003,,HGB,13.0,g/dL,16.01.2024,\n\
P004,F,GLU,120,mg/dL,2024-01-17T08:30:00,\n\
P004,F,GLU,120,mg/dL,2024-01-17T08:30:00,\n\
P005,M,GLU,abc,mg/dL,not a date,\n\
P006,M,ZZZ,5,u,2024-02,\n\
,,,,,,\n\
P007,F,WBC,3.5,10^9/L,Jan 20 2024,\n";

fn write_input(dir: &Path) -> PathBuf {
    let path = dir.join("labs.csv");
    fs::write(&path, SAMPLE).unwrap();
    path
}

fn options(dir: &Path, input: PathBuf) -> RunOptions {
    RunOptions {
        outputs_dir: dir.join("outputs"),
        ..RunOptions::new(input)
    }
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(String::from).collect())
        .collect()
}

#[test]
fn full_run_writes_all_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let result = run(&options(dir.path(), input)).unwrap();

    assert_eq!(result.records, 7);
    assert_eq!(result.load_stats.duplicates_removed, 1);
    assert_eq!(result.load_stats.empty_rows_removed, 1);
    assert_eq!(result.load_stats.empty_columns_removed, vec!["Notes".to_string()]);
    assert_eq!(result.mapping.get(Role::Sex), Some("Gender"));
    assert_eq!(result.mapping.get(Role::Date), Some("Collection_Date"));
    assert_eq!(result.outputs.clean, dir.path().join("cleaned_labs.csv"));

    let cleaned = read_rows(&result.outputs.clean);
    assert_eq!(
        cleaned[0],
        vec![
            "PatientID",
            "Gender",
            "Test",
            "Result",
            "Units",
            "Collection_Date",
            "ref_low",
            "ref_high",
            "ref_units",
            "flag",
        ]
    );
    let dates: Vec<&str> = cleaned[1..].iter().map(|row| row[5].as_str()).collect();
    assert_eq!(
        dates,
        vec![
            "2024-01-15",
            "2024-01-16",
            "2024-01-16",
            "2024-01-17",
            "",
            "",
            "2024-01-20",
        ]
    );
    let flags: Vec<&str> = cleaned[1..].iter().map(|row| row[9].as_str()).collect();
    assert_eq!(
        flags,
        vec!["LOW", "NORMAL", "NORMAL", "HIGH", "UNKNOWN", "UNKNOWN", "LOW"]
    );
    assert_eq!(cleaned[1][6..9], ["13.5", "17.5", "g/dL"]);
    assert_eq!(cleaned[6][6..9], ["", "", ""]);
    assert_eq!(cleaned[5][3], "");

    let flagged = read_rows(&result.outputs.flags);
    assert_eq!(flagged.len(), 1 + 3);
    assert_eq!(result.flagged_records, 3);
    assert_eq!(result.flags.count(Flag::Unknown), 2);
    assert_eq!(
        result.flags.covered_tests,
        vec!["GLU".to_string(), "HGB".to_string(), "WBC".to_string()]
    );

    let summary = read_rows(&result.outputs.summary);
    assert_eq!(
        summary[0],
        vec!["group_type", "group_value", "count", "mean", "min", "max"]
    );
    assert_eq!(summary[1][..3], ["overall", "ALL", "7"]);
    let sex_groups: Vec<(&str, &str)> = summary
        .iter()
        .filter(|row| row[0] == "Gender")
        .map(|row| (row[1].as_str(), row[2].as_str()))
        .collect();
    assert_eq!(sex_groups, vec![("F", "3"), ("M", "2"), ("(missing)", "1")]);

    let charts = result.charts.expect("charts enabled");
    let mut names: Vec<String> = charts
        .files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["GLU_hist.png", "HGB_hist.png", "WBC_hist.png", "ZZZ_hist.png"]
    );
}

#[test]
fn rerun_on_cleaned_output_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let mut first_options = options(dir.path(), input);
    first_options.charts = false;
    let first = run(&first_options).unwrap();

    let rerun_input = dir.path().join("rerun.csv");
    fs::copy(&first.outputs.clean, &rerun_input).unwrap();
    let mut second_options = options(dir.path(), rerun_input);
    second_options.charts = false;
    let second = run(&second_options).unwrap();

    assert_eq!(
        fs::read_to_string(&first.outputs.clean).unwrap(),
        fs::read_to_string(&second.outputs.clean).unwrap()
    );
    assert_eq!(
        fs::read_to_string(&first.outputs.summary).unwrap(),
        fs::read_to_string(&second.outputs.summary).unwrap()
    );
}

#[test]
fn rows_and_columns_left_over_by_normalization_are_removed() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("labs.csv");
    fs::write(
        &input,
        "test,value,date,draw_date\n\
HGB,13.0,01/15/2024,pending\n\
HGB,13,2024-01-15,n/a\n\
GLU,85,not a date,\n",
    )
    .unwrap();
    let mut first_options = options(dir.path(), input);
    first_options.charts = false;
    let first = run(&first_options).unwrap();

    assert_eq!(first.records, 2);
    assert_eq!(first.load_stats.duplicates_removed, 1);
    assert_eq!(first.load_stats.empty_columns_removed, vec!["draw_date".to_string()]);
    assert!(first.date_columns.iter().all(|column| column != "draw_date"));

    let cleaned = read_rows(&first.outputs.clean);
    assert_eq!(
        cleaned[0],
        vec!["test", "value", "date", "ref_low", "ref_high", "ref_units", "flag"]
    );
    assert_eq!(cleaned[1][..3], ["HGB", "13", "2024-01-15"]);
    assert_eq!(cleaned[2][..3], ["GLU", "85", ""]);

    let rerun_input = dir.path().join("rerun.csv");
    fs::copy(&first.outputs.clean, &rerun_input).unwrap();
    let mut second_options = options(dir.path(), rerun_input);
    second_options.charts = false;
    let second = run(&second_options).unwrap();

    assert_eq!(second.load_stats.duplicates_removed, 0);
    assert!(second.load_stats.empty_columns_removed.is_empty());
    assert_eq!(
        fs::read_to_string(&first.outputs.clean).unwrap(),
        fs::read_to_string(&second.outputs.clean).unwrap()
    );
    assert_eq!(
        fs::read_to_string(&first.outputs.summary).unwrap(),
        fs::read_to_string(&second.outputs.summary).unwrap()
    );
}

#[test]
fn empty_group_by_gives_overall_row_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let mut options = options(dir.path(), input);
    options.group_by.clear();
    options.charts = false;
    let result = run(&options).unwrap();

    assert_eq!(result.summary.len(), 1);
    assert!(result.charts.is_none());
    assert!(!dir.path().join("outputs").exists());
}

#[test]
fn explicit_output_paths_and_custom_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let ranges = dir.path().join("ranges.toml");
    fs::write(
        &ranges,
        "[ranges.ZZZ]\nlow = 1.0\nhigh = 4.0\nunits = \"u\"\n",
    )
    .unwrap();
    let out = dir.path().join("out");
    let mut options = options(dir.path(), input);
    options.charts = false;
    options.ranges = Some(ranges);
    options.out_clean = Some(out.join("clean.csv"));
    options.out_flags = Some(out.join("flags.csv"));
    options.out_summary = Some(out.join("summary.csv"));
    let result = run(&options).unwrap();

    assert!(out.join("clean.csv").exists());
    assert!(out.join("flags.csv").exists());
    assert!(out.join("summary.csv").exists());
    assert_eq!(result.flags.covered_tests, vec!["ZZZ".to_string()]);
    assert_eq!(result.flags.count(Flag::High), 1);
    assert_eq!(result.flags.count(Flag::Unknown), 6);
}

#[test]
fn missing_input_exits_with_load_code() {
    let dir = tempfile::tempdir().unwrap();
    let error = run(&options(dir.path(), dir.path().join("missing.csv"))).unwrap_err();
    assert_eq!(error.exit_code(), 2);
}

#[test]
fn invalid_ranges_exit_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let ranges = dir.path().join("ranges.toml");
    fs::write(&ranges, "[ranges.GLU]\nlow = 99.0\nhigh = 70.0\nunits = \"mg/dL\"\n").unwrap();
    let mut options = options(dir.path(), input);
    options.ranges = Some(ranges);
    let error = run(&options).unwrap_err();
    assert_eq!(error.exit_code(), 1);
}

#[test]
fn unwritable_output_exits_with_write_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let mut options = options(dir.path(), input);
    options.charts = false;
    options.out_clean = Some(dir.path().to_path_buf());
    let error = run(&options).unwrap_err();
    assert_eq!(error.exit_code(), 3);
}
