//! Header-row resolution: which physical column plays which [`ColumnRole`].

use crate::types::{Cell, ColumnMap, ColumnRole};

/// Resolve every role against `header_row`.
///
/// Each role takes the first header whose lower-cased text contains [`ColumnRole::needle`].
/// Blank headers never match. Roles are resolved independently, so two roles may in principle
/// land on the same column.
pub fn resolve_columns(header_row: &[Cell]) -> ColumnMap {
    let lowered: Vec<Option<String>> = header_row
        .iter()
        .map(|h| (!h.is_blank()).then(|| h.to_text().to_lowercase()))
        .collect();

    let mut map = ColumnMap::default();
    for role in ColumnRole::ALL {
        let needle = role.needle();
        let idx = lowered
            .iter()
            .position(|h| h.as_deref().is_some_and(|h| h.contains(needle)));
        map.set(role, idx);
    }
    map
}
