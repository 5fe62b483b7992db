//! Range check outcomes.

use std::fmt;
use std::str::FromStr;

use crate::range::ReferenceRange;

/// Classification of one record against its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    Low,
    High,
    Normal,
    Unknown,
}

impl Flag {
    pub const ALL: [Flag; 4] = [Flag::Low, Flag::High, Flag::Normal, Flag::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Low => "LOW",
            Flag::High => "HIGH",
            Flag::Normal => "NORMAL",
            Flag::Unknown => "UNKNOWN",
        }
    }

    /// True for LOW and HIGH, the rows written to the flags output.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Flag::Low | Flag::High)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(Flag::Low),
            "HIGH" => Ok(Flag::High),
            "NORMAL" => Ok(Flag::Normal),
            "UNKNOWN" => Ok(Flag::Unknown),
            other => Err(format!("unknown flag: {other}")),
        }
    }
}

/// Why a record ended up UNKNOWN. Diagnostic only; output keeps the single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnknownReason {
    /// The test name or value column could not be resolved.
    ColumnsUnresolved,
    /// The value is missing or not numeric.
    MissingValue,
    /// The test is not in the reference table.
    TestNotInTable,
    /// The test is sex-keyed and neither the sex nor a default range applies.
    RangeUnresolved,
}

impl UnknownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownReason::ColumnsUnresolved => "columns unresolved",
            UnknownReason::MissingValue => "missing or non-numeric value",
            UnknownReason::TestNotInTable => "test not in reference table",
            UnknownReason::RangeUnresolved => "no range for sex",
        }
    }
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one record.
///
/// `range` is set exactly when `flag` is not UNKNOWN; `unknown_reason` is set
/// exactly when it is.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCheck {
    pub flag: Flag,
    pub range: Option<ReferenceRange>,
    pub unknown_reason: Option<UnknownReason>,
}

impl RangeCheck {
    pub fn unknown(reason: UnknownReason) -> Self {
        Self {
            flag: Flag::Unknown,
            range: None,
            unknown_reason: Some(reason),
        }
    }

    pub fn classified(flag: Flag, range: ReferenceRange) -> Self {
        Self {
            flag,
            range: Some(range),
            unknown_reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parses_case_insensitively() {
        assert_eq!("low".parse::<Flag>(), Ok(Flag::Low));
        assert_eq!(" Normal ".parse::<Flag>(), Ok(Flag::Normal));
        assert!("borderline".parse::<Flag>().is_err());
    }

    #[test]
    fn only_low_and_high_are_out_of_range() {
        let out: Vec<Flag> = Flag::ALL
            .into_iter()
            .filter(Flag::is_out_of_range)
            .collect();
        assert_eq!(out, vec![Flag::Low, Flag::High]);
    }
}
