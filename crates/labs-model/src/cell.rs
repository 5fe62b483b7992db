//! Cell values of a loaded lab table.

use std::fmt;

/// A single cell. Loaded cells are `Text` or `Missing`; normalization turns
/// the value column into `Number`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    Text(String),
    Number(f64),
    #[default]
    Missing,
}

impl CellValue {
    /// Builds a cell from raw text, treating blank input as missing.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Numeric view of the cell. Text is parsed leniently; anything that is
    /// not a finite number yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) if value.is_finite() => Some(*value),
            CellValue::Number(_) | CellValue::Missing => None,
            CellValue::Text(text) => parse_finite_f64(text),
        }
    }

    /// Text view of the cell, `None` when missing.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Missing => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(value) => f.write_str(&format_numeric(*value)),
            CellValue::Missing => Ok(()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from_raw(value)
    }
}

/// Parses a string as a finite f64, returning None for blank, invalid or
/// non-finite input.
pub fn parse_finite_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_raw_text_is_missing() {
        assert_eq!(CellValue::from_raw("   "), CellValue::Missing);
        assert_eq!(CellValue::from_raw(" HGB "), CellValue::Text("HGB".to_string()));
    }

    #[test]
    fn numeric_view_rejects_non_finite() {
        assert_eq!(CellValue::Text("13.5".to_string()).as_f64(), Some(13.5));
        assert_eq!(CellValue::Text("NaN".to_string()).as_f64(), None);
        assert_eq!(CellValue::Text("inf".to_string()).as_f64(), None);
        assert_eq!(CellValue::Text("<5".to_string()).as_f64(), None);
        assert_eq!(CellValue::Number(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::Missing.as_f64(), None);
    }

    #[test]
    fn format_numeric_strips_trailing_zeros() {
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(10.5), "10.5");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(0.25), "0.25");
    }

    #[test]
    fn display_renders_missing_as_empty() {
        assert_eq!(CellValue::Missing.to_string(), "");
        assert_eq!(CellValue::Number(99.0).to_string(), "99");
    }
}
