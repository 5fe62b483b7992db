//! CLI argument definitions for the lab results analyzer.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "labs",
    version,
    about = "Lab results analyzer - clean, flag and summarize lab CSV exports",
    long_about = "Clean a lab results CSV, normalize its schema, flag values against \
                  sex-aware reference ranges and summarize them.\n\n\
                  Writes a cleaned CSV, a flagged-only CSV, a summary CSV and \
                  optional per-test histograms."
)]
pub struct Cli {
    /// Lab results CSV file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Group-by fields for the summary (canonical roles or column names).
    ///
    /// Pass `--by` with no values for the overall row only.
    #[arg(
        long = "by",
        value_name = "FIELD",
        num_args = 0..,
        default_values_t = [String::from("test_name"), String::from("sex")]
    )]
    pub by: Vec<String>,

    /// Cleaned output CSV (default: cleaned_<stem>.csv next to INPUT).
    #[arg(long = "out-clean", value_name = "PATH")]
    pub out_clean: Option<PathBuf>,

    /// Flagged-only output CSV (default: flags_<stem>.csv next to INPUT).
    #[arg(long = "out-flags", value_name = "PATH")]
    pub out_flags: Option<PathBuf>,

    /// Summary output CSV (default: summary_<stem>.csv next to INPUT).
    #[arg(long = "out-summary", value_name = "PATH")]
    pub out_summary: Option<PathBuf>,

    /// Skip histogram generation.
    #[arg(long = "no-charts")]
    pub no_charts: bool,

    /// Directory for histogram images.
    #[arg(long = "outputs-dir", value_name = "DIR", default_value = "outputs")]
    pub outputs_dir: PathBuf,

    /// Reference-range TOML file replacing the built-in demo table.
    #[arg(long = "ranges", value_name = "PATH")]
    pub ranges: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient ids and result values in debug/trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
