use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use labs_model::{RangeEntry, RangeTable, ReferenceRange};

use crate::error::StandardsError;

const DEFAULT_RANGES_TOML: &str = include_str!("../data/reference_ranges.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RangesFile {
    #[serde(default)]
    ranges: BTreeMap<String, RangeEntry>,
}

/// The built-in demo table: HGB (sex-specific with default), WBC and GLU.
pub fn load_default_reference_ranges() -> Result<RangeTable, StandardsError> {
    parse_reference_ranges(DEFAULT_RANGES_TOML, "built-in reference ranges")
}

/// Loads a reference-range table from a TOML file.
pub fn load_reference_ranges(path: &Path) -> Result<RangeTable, StandardsError> {
    let content =
        std::fs::read_to_string(path).map_err(|source| StandardsError::io(path, source))?;
    parse_reference_ranges(&content, &path.display().to_string())
}

/// Parses and validates reference-range TOML.
///
/// Test names are trimmed and uppercased. Every range must have finite
/// bounds with `low <= high`, and a sex-keyed entry must define at least one
/// range.
pub fn parse_reference_ranges(
    content: &str,
    source_name: &str,
) -> Result<RangeTable, StandardsError> {
    let file: RangesFile = toml::from_str(content).map_err(|source| StandardsError::Toml {
        source_name: source_name.to_string(),
        source,
    })?;
    let mut table = RangeTable::new();
    for (test, entry) in file.ranges {
        let key = RangeTable::key(&test);
        if key.is_empty() {
            return Err(StandardsError::invalid(&test, "test name is empty"));
        }
        validate_entry(&key, &entry)?;
        if table.contains(&key) {
            return Err(StandardsError::invalid(&key, "test is defined more than once"));
        }
        table.insert(&key, entry);
    }
    debug!(source = source_name, tests = table.len(), "loaded reference ranges");
    Ok(table)
}

fn validate_entry(test: &str, entry: &RangeEntry) -> Result<(), StandardsError> {
    let ranges = entry.ranges();
    if ranges.is_empty() {
        return Err(StandardsError::invalid(test, "entry defines no range"));
    }
    for range in ranges {
        validate_range(test, range)?;
    }
    Ok(())
}

fn validate_range(test: &str, range: &ReferenceRange) -> Result<(), StandardsError> {
    if !range.low.is_finite() || !range.high.is_finite() {
        return Err(StandardsError::invalid(test, "bounds must be finite numbers"));
    }
    if range.low > range.high {
        return Err(StandardsError::invalid(
            test,
            format!("low {} is greater than high {}", range.low, range.high),
        ));
    }
    Ok(())
}
