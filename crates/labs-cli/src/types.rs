use std::path::PathBuf;

use labs_ingest::CleanStats;
use labs_model::{ColumnMapping, SummaryRow};
use labs_report::OutputPaths;
use labs_transform::FlagReport;

/// Inputs for a single analyzer run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub group_by: Vec<String>,
    pub out_clean: Option<PathBuf>,
    pub out_flags: Option<PathBuf>,
    pub out_summary: Option<PathBuf>,
    pub charts: bool,
    pub outputs_dir: PathBuf,
    pub ranges: Option<PathBuf>,
}

impl RunOptions {
    /// Options with the default group-by fields, charts enabled.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            group_by: vec!["test_name".to_string(), "sex".to_string()],
            out_clean: None,
            out_flags: None,
            out_summary: None,
            charts: true,
            outputs_dir: PathBuf::from("outputs"),
            ranges: None,
        }
    }
}

#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub columns: usize,
    pub records: usize,
    pub load_stats: CleanStats,
    pub mapping: ColumnMapping,
    pub date_columns: Vec<String>,
    pub flags: FlagReport,
    pub summary: Vec<SummaryRow>,
    pub flagged_records: usize,
    pub outputs: OutputPaths,
    /// `None` when charts were disabled or the chart stage failed.
    pub charts: Option<ChartOutput>,
}

#[derive(Debug)]
pub struct ChartOutput {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}
