//! Reference-range table types.
//!
//! Entries are keyed by uppercased test name and are either a single unisex
//! range or a sex-keyed set with an optional `default` fallback.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive `[low, high]` interval with its units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceRange {
    pub low: f64,
    pub high: f64,
    pub units: String,
}

impl ReferenceRange {
    pub fn new(low: f64, high: f64, units: impl Into<String>) -> Self {
        Self {
            low,
            high,
            units: units.into(),
        }
    }
}

impl fmt::Display for ReferenceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} {}", self.low, self.high, self.units)
    }
}

/// Sex-specific ranges. Any key may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SexRanges {
    #[serde(rename = "M", default, skip_serializing_if = "Option::is_none")]
    pub male: Option<ReferenceRange>,
    #[serde(rename = "F", default, skip_serializing_if = "Option::is_none")]
    pub female: Option<ReferenceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ReferenceRange>,
}

/// One test's entry in the reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeEntry {
    Unisex(ReferenceRange),
    BySex(SexRanges),
}

impl RangeEntry {
    /// Every concrete range in the entry.
    pub fn ranges(&self) -> Vec<&ReferenceRange> {
        match self {
            RangeEntry::Unisex(range) => vec![range],
            RangeEntry::BySex(by_sex) => [&by_sex.male, &by_sex.female, &by_sex.default]
                .into_iter()
                .flatten()
                .collect(),
        }
    }
}

/// Normalized biological sex used for range lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference ranges keyed by uppercased, trimmed test name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeTable {
    entries: BTreeMap<String, RangeEntry>,
}

impl RangeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes a test name into its table key.
    pub fn key(test: &str) -> String {
        test.trim().to_uppercase()
    }

    pub fn insert(&mut self, test: &str, entry: RangeEntry) {
        self.entries.insert(Self::key(test), entry);
    }

    pub fn get(&self, test: &str) -> Option<&RangeEntry> {
        self.entries.get(&Self::key(test))
    }

    pub fn contains(&self, test: &str) -> bool {
        self.entries.contains_key(&Self::key(test))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Test names in ascending order.
    pub fn tests(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RangeEntry)> + '_ {
        self.entries.iter().map(|(test, entry)| (test.as_str(), entry))
    }
}

impl FromIterator<(String, RangeEntry)> for RangeTable {
    fn from_iter<I: IntoIterator<Item = (String, RangeEntry)>>(iter: I) -> Self {
        let mut table = RangeTable::new();
        for (test, entry) in iter {
            table.insert(&test, entry);
        }
        table
    }
}
