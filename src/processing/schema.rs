//! Output schema construction.
//!
//! Derived columns are placed next to the column they are computed from: "Localizadores do
//! Gabinete" right after the locators column, "Dígito" and "Feito" right after the process
//! number. When the anchor column is missing they are appended instead.

use crate::types::{Cell, ColumnMap, DerivedColumn, HeaderDefinition};

/// Build the ordered output schema for `header_row`.
pub fn build_schema(header_row: &[Cell], columns: &ColumnMap) -> Vec<HeaderDefinition> {
    let mut defs: Vec<HeaderDefinition> = header_row
        .iter()
        .enumerate()
        .map(|(index, h)| HeaderDefinition::Existing {
            name: h.to_text(),
            index,
        })
        .collect();

    insert_after_anchor(
        &mut defs,
        columns.locators,
        [HeaderDefinition::derived(DerivedColumn::GabineteCount)],
    );
    insert_after_anchor(
        &mut defs,
        columns.process_number,
        [
            HeaderDefinition::derived(DerivedColumn::Digito),
            HeaderDefinition::derived(DerivedColumn::Feito),
        ],
    );

    defs
}

/// Output header names, in schema order.
pub fn header_names(defs: &[HeaderDefinition]) -> Vec<String> {
    defs.iter().map(|d| d.name().to_string()).collect()
}

/// Insert `new_defs` after the existing definition drawn from `anchor`, or append them.
///
/// The anchor is looked up by source index on every call, so earlier insertions never shift it.
fn insert_after_anchor<const N: usize>(
    defs: &mut Vec<HeaderDefinition>,
    anchor: Option<usize>,
    new_defs: [HeaderDefinition; N],
) {
    let position = anchor.and_then(|src| defs.iter().position(|d| d.existing_index() == Some(src)));
    match position {
        Some(pos) => {
            for (offset, def) in new_defs.into_iter().enumerate() {
                defs.insert(pos + 1 + offset, def);
            }
        }
        None => defs.extend(new_defs),
    }
}
