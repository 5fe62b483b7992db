use tracing::debug;

use labs_model::{CaseInsensitiveSet, ColumnMapping, Role};

/// Returns the first header matching one of `candidates` (case-insensitive),
/// in candidate order, with the header's original spelling.
pub fn infer_column<S: AsRef<str>>(headers: &[S], candidates: &[&str]) -> Option<String> {
    let lookup = CaseInsensitiveSet::new(headers);
    candidates
        .iter()
        .find_map(|candidate| lookup.get(candidate))
        .map(str::to_string)
}

/// Resolves every canonical role against `headers`.
///
/// A role with no matching header is left unresolved. Two roles never share
/// a candidate name, so each header resolves to at most one role.
pub fn infer_mapping<S: AsRef<str>>(headers: &[S]) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();
    for role in Role::ALL {
        match infer_column(headers, role.candidates()) {
            Some(column) => {
                debug!(role = %role, column = %column, "resolved column role");
                mapping.set(role, column);
            }
            None => debug!(role = %role, "column role unresolved"),
        }
    }
    mapping
}

/// Resolves a group-by key to an actual column.
///
/// A canonical role name takes priority over a literal column of the same
/// name; literal names match exactly first, then case-insensitively.
pub fn resolve_group_column<S: AsRef<str>>(
    key: &str,
    mapping: &ColumnMapping,
    headers: &[S],
) -> Option<String> {
    if let Ok(role) = key.parse::<Role>() {
        if let Some(column) = mapping.get(role) {
            return Some(column.to_string());
        }
    }
    if headers.iter().any(|header| header.as_ref() == key) {
        return Some(key.to_string());
    }
    CaseInsensitiveSet::new(headers).get(key).map(str::to_string)
}
