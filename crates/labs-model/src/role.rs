//! Canonical column roles and the resolved column mapping.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Semantic column category resolved against the input header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    PatientId,
    Sex,
    TestName,
    Value,
    Units,
    Date,
}

impl Role {
    /// All roles in resolution and display order.
    pub const ALL: [Role; 6] = [
        Role::PatientId,
        Role::Sex,
        Role::TestName,
        Role::Value,
        Role::Units,
        Role::Date,
    ];

    /// Canonical role name as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PatientId => "patient_id",
            Role::Sex => "sex",
            Role::TestName => "test_name",
            Role::Value => "value",
            Role::Units => "units",
            Role::Date => "date",
        }
    }

    /// Header names that resolve to this role, highest priority first.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Role::PatientId => &["patient_id", "patientid", "patient", "mrn", "member_id"],
            Role::Sex => &["sex", "gender", "biological_sex"],
            Role::TestName => &["test", "test_name", "analyte", "labtest"],
            Role::Value => &["value", "result", "result_value", "lab_value"],
            Role::Units => &["units", "unit", "uom"],
            Role::Date => &["date", "collection_date", "draw_date", "result_date"],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Parses a canonical role name. Matching is exact: group-by keys that are
    /// not role names are treated as literal column names by the caller.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown column role: {s}"))
    }
}

/// Canonical role → actual input column. Unresolved roles are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: BTreeMap<Role, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: Role, column: impl Into<String>) -> Self {
        self.columns.insert(role, column.into());
        self
    }

    pub fn set(&mut self, role: Role, column: impl Into<String>) {
        self.columns.insert(role, column.into());
    }

    pub fn get(&self, role: Role) -> Option<&str> {
        self.columns.get(&role).map(String::as_str)
    }

    /// Unresolves every role mapped to `column`.
    pub fn clear_column(&mut self, column: &str) {
        self.columns.retain(|_, mapped| mapped.as_str() != column);
    }

    pub fn is_resolved(&self, role: Role) -> bool {
        self.columns.contains_key(&role)
    }

    /// Every role with its resolution, in `Role::ALL` order.
    pub fn entries(&self) -> impl Iterator<Item = (Role, Option<&str>)> + '_ {
        Role::ALL.into_iter().map(|role| (role, self.get(role)))
    }
}
