//! Reference-range flagging.
//!
//! Each record is checked independently: the test name is looked up in the
//! range table, the record's sex (when known) selects a sex-specific range,
//! and the numeric value is classified against the inclusive bounds.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use labs_model::{
    CellValue, ColumnMapping, DERIVED_COLUMNS, Flag, LabTable, RangeCheck, RangeEntry, RangeTable,
    ReferenceRange, Role, Sex, UnknownReason,
};

/// Normalizes a raw sex value: m/male/man → M, f/female/woman → F,
/// anything else (including missing) → unknown.
pub fn normalize_sex(raw: Option<&str>) -> Sex {
    let Some(raw) = raw else {
        return Sex::Unknown;
    };
    match raw.trim().to_lowercase().as_str() {
        "m" | "male" | "man" => Sex::Male,
        "f" | "female" | "woman" => Sex::Female,
        _ => Sex::Unknown,
    }
}

/// Picks the applicable range for an entry.
///
/// Unisex entries apply to everyone. Sex-keyed entries use the matching sex,
/// then `default`; with neither there is no range.
pub fn resolve_range(entry: &RangeEntry, sex: Sex) -> Option<&ReferenceRange> {
    match entry {
        RangeEntry::Unisex(range) => Some(range),
        RangeEntry::BySex(ranges) => {
            let specific = match sex {
                Sex::Male => ranges.male.as_ref(),
                Sex::Female => ranges.female.as_ref(),
                Sex::Unknown => None,
            };
            specific.or(ranges.default.as_ref())
        }
    }
}

/// Classifies a value against inclusive bounds; boundary values are NORMAL.
pub fn classify(value: f64, range: &ReferenceRange) -> Flag {
    if value < range.low {
        Flag::Low
    } else if value > range.high {
        Flag::High
    } else {
        Flag::Normal
    }
}

/// Checks one value. Pure function of its arguments.
pub fn check_value(
    test: &str,
    sex: Sex,
    value: Option<f64>,
    ranges: &RangeTable,
) -> RangeCheck {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return RangeCheck::unknown(UnknownReason::MissingValue);
    };
    let Some(entry) = ranges.get(test) else {
        return RangeCheck::unknown(UnknownReason::TestNotInTable);
    };
    let Some(range) = resolve_range(entry, sex) else {
        return RangeCheck::unknown(UnknownReason::RangeUnresolved);
    };
    RangeCheck::classified(classify(value, range), range.clone())
}

/// Counts from one flagging pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagReport {
    /// False when the test name or value column is unresolved.
    pub applied: bool,
    pub flag_counts: BTreeMap<Flag, usize>,
    pub unknown_reasons: BTreeMap<UnknownReason, usize>,
    /// Uppercased tests present in the data that have a table entry.
    pub covered_tests: Vec<String>,
}

impl FlagReport {
    pub fn count(&self, flag: Flag) -> usize {
        self.flag_counts.get(&flag).copied().unwrap_or(0)
    }

    pub fn out_of_range(&self) -> usize {
        self.count(Flag::Low) + self.count(Flag::High)
    }
}

/// Adds `ref_low`, `ref_high`, `ref_units` and `flag` to every record.
///
/// Existing columns with those names are overwritten in place. When the test
/// name or value role is unresolved every record is UNKNOWN with empty range
/// fields.
pub fn apply_reference_ranges(
    table: &mut LabTable,
    mapping: &ColumnMapping,
    ranges: &RangeTable,
) -> FlagReport {
    let height = table.height();
    let mut ref_low = vec![CellValue::Missing; height];
    let mut ref_high = vec![CellValue::Missing; height];
    let mut ref_units = vec![CellValue::Missing; height];
    let mut flags = vec![CellValue::Text(Flag::Unknown.to_string()); height];
    let mut report = FlagReport::default();

    let test_index = mapping
        .get(Role::TestName)
        .and_then(|name| table.column_index(name));
    let value_index = mapping.get(Role::Value).and_then(|name| table.column_index(name));
    let sex_index = mapping.get(Role::Sex).and_then(|name| table.column_index(name));

    match (test_index, value_index) {
        (Some(test_index), Some(value_index)) => {
            report.applied = true;
            let mut covered = BTreeSet::new();
            for (row_idx, row) in table.rows.iter().enumerate() {
                let test = row[test_index].as_text().unwrap_or_default();
                if ranges.contains(&test) {
                    covered.insert(RangeTable::key(&test));
                }
                let sex = sex_index.map_or(Sex::Unknown, |idx| {
                    normalize_sex(row[idx].as_text().as_deref())
                });
                let check = check_value(&test, sex, row[value_index].as_f64(), ranges);

                *report.flag_counts.entry(check.flag).or_insert(0) += 1;
                if let Some(reason) = check.unknown_reason {
                    *report.unknown_reasons.entry(reason).or_insert(0) += 1;
                }
                if let Some(range) = check.range {
                    ref_low[row_idx] = CellValue::Number(range.low);
                    ref_high[row_idx] = CellValue::Number(range.high);
                    ref_units[row_idx] = CellValue::from(range.units.as_str());
                }
                flags[row_idx] = CellValue::Text(check.flag.to_string());
            }
            report.covered_tests = covered.into_iter().collect();
        }
        _ => {
            debug!(
                test_column = ?mapping.get(Role::TestName),
                value_column = ?mapping.get(Role::Value),
                "reference ranges not applied: test name or value column unresolved"
            );
            if height > 0 {
                report.flag_counts.insert(Flag::Unknown, height);
                report
                    .unknown_reasons
                    .insert(UnknownReason::ColumnsUnresolved, height);
            }
        }
    }

    let derived = [ref_low, ref_high, ref_units, flags];
    for (name, values) in DERIVED_COLUMNS.into_iter().zip(derived) {
        table.set_column(name, values);
    }

    debug!(
        applied = report.applied,
        low = report.count(Flag::Low),
        high = report.count(Flag::High),
        normal = report.count(Flag::Normal),
        unknown = report.count(Flag::Unknown),
        "reference ranges checked"
    );
    report
}
