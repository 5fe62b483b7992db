//! Lab analysis pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ranges**: Load the reference-range table (built-in or TOML file)
//! 2. **Load**: Read and clean the input CSV
//! 3. **Normalize**: Infer column roles, normalize dates and values
//! 4. **Flag**: Attach reference ranges and LOW/HIGH/NORMAL/UNKNOWN flags
//! 5. **Summarize**: Overall and grouped statistics
//! 6. **Output**: Write cleaned, flagged-only and summary CSVs
//! 7. **Charts**: Per-test histograms (failures never abort the run)

use std::path::Path;
use std::time::Instant;

use tracing::{info, info_span, trace, warn};

use labs_ingest::{IngestError, LoadReport, read_lab_csv};
use labs_model::{FLAG_COLUMN, LabTable, RangeTable, Role, SummaryRow};
use labs_report::{
    OutputPaths, default_output_paths, flagged_only, write_histograms, write_summary_csv,
    write_table_csv,
};
use labs_standards::{StandardsError, load_default_reference_ranges, load_reference_ranges};
use labs_transform::{
    FlagReport, NormalizedSchema, apply_reference_ranges, normalize_schema, summarize,
};

use crate::logging::redact_value;
use crate::types::{ChartOutput, RunOptions, RunResult};

/// A failed run, classified by the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Standards(#[from] StandardsError),

    #[error(transparent)]
    Load(#[from] IngestError),

    #[error("failed to write outputs: {0:#}")]
    Write(anyhow::Error),
}

impl PipelineError {
    /// Process exit code: 1 for configuration, 2 for load and 3 for write failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Standards(_) => 1,
            PipelineError::Load(_) => 2,
            PipelineError::Write(_) => 3,
        }
    }
}

/// Load the reference-range table.
pub fn load_ranges(path: Option<&Path>) -> Result<RangeTable, StandardsError> {
    info_span!("ranges").in_scope(|| -> Result<RangeTable, StandardsError> {
        let start = Instant::now();
        let ranges = match path {
            Some(path) => load_reference_ranges(path)?,
            None => load_default_reference_ranges()?,
        };
        info!(
            source = %path.map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
            tests = ranges.len(),
            duration_ms = start.elapsed().as_millis(),
            "reference ranges loaded"
        );
        Ok(ranges)
    })
}

/// Read and clean the input file.
pub fn load(input: &Path) -> Result<LoadReport, IngestError> {
    let span = info_span!("load", input = %input.display());
    span.in_scope(|| -> Result<LoadReport, IngestError> {
        let start = Instant::now();
        let report = read_lab_csv(input)?;
        info!(
            rows_read = report.stats.rows_read,
            records = report.table.height(),
            columns = report.table.width(),
            empty_rows_removed = report.stats.empty_rows_removed,
            empty_columns_removed = report.stats.empty_columns_removed.len(),
            duplicates_removed = report.stats.duplicates_removed,
            duration_ms = start.elapsed().as_millis(),
            "load complete"
        );
        Ok(report)
    })
}

/// Resolve column roles and normalize dates and values in place.
pub fn normalize(table: &mut LabTable) -> NormalizedSchema {
    info_span!("normalize").in_scope(|| {
        let start = Instant::now();
        let schema = normalize_schema(table);
        info!(
            resolved_roles = schema
                .mapping
                .entries()
                .filter(|(_, column)| column.is_some())
                .count(),
            date_columns = schema.date_columns.len(),
            dates_unparsed = schema.dates_unparsed,
            values_unparsed = schema.values_unparsed,
            columns_removed = schema.columns_removed.len(),
            duplicates_removed = schema.duplicates_removed,
            duration_ms = start.elapsed().as_millis(),
            "normalize complete"
        );
        schema
    })
}

/// Attach reference ranges and flags.
pub fn flag(table: &mut LabTable, schema: &NormalizedSchema, ranges: &RangeTable) -> FlagReport {
    info_span!("flag").in_scope(|| {
        let start = Instant::now();
        let report = apply_reference_ranges(table, &schema.mapping, ranges);
        if report.covered_tests.is_empty() {
            info!("no tests matched the reference ranges");
        } else {
            info!(
                tests = %report.covered_tests.join(", "),
                "reference ranges applied"
            );
        }
        trace_out_of_range(table, schema);
        info!(
            out_of_range = report.out_of_range(),
            duration_ms = start.elapsed().as_millis(),
            "flag complete"
        );
        report
    })
}

fn trace_out_of_range(table: &LabTable, schema: &NormalizedSchema) {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    let column = |role: Role| {
        schema
            .mapping
            .get(role)
            .and_then(|name| table.column_index(name))
    };
    let (Some(flag_index), Some(value_index)) =
        (table.column_index(FLAG_COLUMN), column(Role::Value))
    else {
        return;
    };
    let patient_index = column(Role::PatientId);
    let test_index = column(Role::TestName);
    for row in &table.rows {
        let flag = row[flag_index].to_string();
        if flag != "LOW" && flag != "HIGH" {
            continue;
        }
        let patient = patient_index.map(|idx| row[idx].to_string()).unwrap_or_default();
        let test = test_index.map(|idx| row[idx].to_string()).unwrap_or_default();
        let value = row[value_index].to_string();
        trace!(
            patient_id = %redact_value(&patient),
            test = %test,
            value = %redact_value(&value),
            flag = %flag,
            "out-of-range result"
        );
    }
}

/// Write the cleaned, flagged-only and summary CSVs.
pub fn output(
    table: &LabTable,
    summary: &[SummaryRow],
    paths: &OutputPaths,
) -> anyhow::Result<usize> {
    info_span!("output").in_scope(|| -> anyhow::Result<usize> {
        let start = Instant::now();
        let flagged = flagged_only(table);
        write_table_csv(&paths.clean, table)?;
        write_table_csv(&paths.flags, &flagged)?;
        write_summary_csv(&paths.summary, summary)?;
        info!(
            clean = %paths.clean.display(),
            flags = %paths.flags.display(),
            summary = %paths.summary.display(),
            flagged_records = flagged.height(),
            duration_ms = start.elapsed().as_millis(),
            "output complete"
        );
        Ok(flagged.height())
    })
}

/// Run every stage for one input file.
pub fn run(options: &RunOptions) -> Result<RunResult, PipelineError> {
    let run_span = info_span!("run", input = %options.input.display());
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    let ranges = load_ranges(options.ranges.as_deref())?;
    let LoadReport {
        mut table,
        stats: mut load_stats,
    } = load(&options.input)?;
    let schema = normalize(&mut table);
    load_stats.duplicates_removed += schema.duplicates_removed;
    load_stats
        .empty_columns_removed
        .extend(schema.columns_removed.iter().cloned());
    let flags = flag(&mut table, &schema, &ranges);

    let summary = info_span!("summarize").in_scope(|| {
        let start = Instant::now();
        let rows = summarize(&table, &schema.mapping, &options.group_by);
        info!(
            rows = rows.len(),
            duration_ms = start.elapsed().as_millis(),
            "summarize complete"
        );
        rows
    });

    let outputs = default_output_paths(&options.input).with_overrides(
        options.out_clean.clone(),
        options.out_flags.clone(),
        options.out_summary.clone(),
    );
    let flagged_records = output(&table, &summary, &outputs).map_err(PipelineError::Write)?;

    let charts = if options.charts {
        info_span!("charts").in_scope(|| {
            let start = Instant::now();
            match write_histograms(&table, &schema.mapping, &options.outputs_dir) {
                Ok(files) => {
                    info!(
                        charts = files.len(),
                        dir = %options.outputs_dir.display(),
                        duration_ms = start.elapsed().as_millis(),
                        "charts complete"
                    );
                    Some(ChartOutput {
                        dir: options.outputs_dir.clone(),
                        files,
                    })
                }
                Err(error) => {
                    warn!(error = %format!("{error:#}"), "chart step failed; continuing");
                    None
                }
            }
        })
    } else {
        None
    };

    info!(
        records = table.height(),
        duration_ms = run_start.elapsed().as_millis(),
        "run complete"
    );

    Ok(RunResult {
        input: options.input.clone(),
        columns: table.width(),
        records: table.height(),
        load_stats,
        mapping: schema.mapping,
        date_columns: schema.date_columns,
        flags,
        summary,
        flagged_records,
        outputs,
        charts,
    })
}
