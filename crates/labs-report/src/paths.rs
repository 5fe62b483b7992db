//! Output file naming.

use std::path::{Path, PathBuf};

const CLEAN_PREFIX: &str = "cleaned_";
const FLAGS_PREFIX: &str = "flags_";
const SUMMARY_PREFIX: &str = "summary_";

/// Destinations of the three CSV outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub clean: PathBuf,
    pub flags: PathBuf,
    pub summary: PathBuf,
}

impl OutputPaths {
    /// Replaces defaults with any explicitly requested paths.
    pub fn with_overrides(
        mut self,
        clean: Option<PathBuf>,
        flags: Option<PathBuf>,
        summary: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = clean {
            self.clean = path;
        }
        if let Some(path) = flags {
            self.flags = path;
        }
        if let Some(path) = summary {
            self.summary = path;
        }
        self
    }
}

/// `cleaned_<stem>.csv`, `flags_<stem>.csv` and `summary_<stem>.csv` in the
/// input file's directory.
pub fn default_output_paths(input: &Path) -> OutputPaths {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "labs".to_string());
    let sibling = |prefix: &str| input.with_file_name(format!("{prefix}{stem}.csv"));
    OutputPaths {
        clean: sibling(CLEAN_PREFIX),
        flags: sibling(FLAGS_PREFIX),
        summary: sibling(SUMMARY_PREFIX),
    }
}
