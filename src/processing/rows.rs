//! Per-row cleaning, derivation and re-assembly.

use crate::types::{Cell, ColumnMap, DerivedColumn, HeaderDefinition};

use super::dates::parse_date_cell;
use super::locators::{is_space, normalize_locator_cell};

/// Value of the "Feito" column for every row.
pub const FEITO_DEFAULT: &str = "FALSO";

/// Zero-based position of the check digit inside the process number.
pub const DIGITO_POSITION: usize = 6;

/// Output of [`transform_row`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedRow {
    /// Row laid out per the schema.
    pub cells: Vec<Cell>,
    /// `(G)` markers counted in the locator cell.
    pub gabinete_count: usize,
}

/// Clean `row`, compute the derived values and lay the row out per `schema`.
///
/// The returned row always has `schema.len()` cells.
pub fn transform_row(row: &[Cell], columns: &ColumnMap, schema: &[HeaderDefinition]) -> TransformedRow {
    let mut working = row.to_vec();

    if let Some(cell) = non_blank_mut(&mut working, columns.process_number) {
        *cell = Cell::Text(cell.to_text().trim_matches(is_space).to_string());
    }

    let mut gabinete_count = 0;
    if let Some(cell) = non_blank_mut(&mut working, columns.locators) {
        let normalized = normalize_locator_cell(cell);
        gabinete_count = normalized.gabinete_count;
        *cell = Cell::Text(normalized.text);
    }

    for date_col in [columns.inclusion_date, columns.last_event_date] {
        if let Some(cell) = non_blank_mut(&mut working, date_col) {
            *cell = parse_date_cell(cell);
        }
    }

    let digito = non_blank(&working, columns.process_number)
        .map(|cell| digito_of(&cell.to_text()))
        .unwrap_or_default();

    let cells = schema
        .iter()
        .map(|def| match def {
            HeaderDefinition::Existing { index, .. } => match working.get(*index) {
                Some(Cell::Blank) | None => Cell::Text(String::new()),
                Some(cell) => cell.clone(),
            },
            HeaderDefinition::Derived { column, .. } => match column {
                DerivedColumn::GabineteCount => Cell::Number(gabinete_count as f64),
                DerivedColumn::Digito => Cell::Text(digito.clone()),
                DerivedColumn::Feito => Cell::text(FEITO_DEFAULT),
            },
        })
        .collect();

    TransformedRow {
        cells,
        gabinete_count,
    }
}

/// Seventh character of `process_number`, or `""` when it is shorter than that.
pub fn digito_of(process_number: &str) -> String {
    process_number
        .chars()
        .nth(DIGITO_POSITION)
        .map(String::from)
        .unwrap_or_default()
}

fn non_blank(row: &[Cell], idx: Option<usize>) -> Option<&Cell> {
    row.get(idx?).filter(|c| !c.is_blank())
}

fn non_blank_mut(row: &mut [Cell], idx: Option<usize>) -> Option<&mut Cell> {
    row.get_mut(idx?).filter(|c| !c.is_blank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::headers::resolve_columns;
    use crate::processing::schema::build_schema;
    use crate::types::grid_from_strs;
    use chrono::NaiveDate;

    fn layout(names: &[&str]) -> (ColumnMap, Vec<HeaderDefinition>) {
        let header = grid_from_strs([names.iter().copied()]).remove(0);
        let map = resolve_columns(&header);
        let schema = build_schema(&header, &map);
        (map, schema)
    }

    #[test]
    fn derives_digito_feito_and_gabinete_count() {
        let (map, schema) = layout(&["Número Processo", "Localizadores", "Último Evento"]);
        let row = vec![
            Cell::text("  5001234-56.2023.4.04.7000 "),
            Cell::text("SEC (Principal) - ANALISAR (G) - Prazo (G)"),
            Cell::text("02/02/2023 11:00"),
        ];

        let out = transform_row(&row, &map, &schema);
        assert_eq!(out.gabinete_count, 2);
        assert_eq!(out.cells.len(), schema.len());
        assert_eq!(
            out.cells,
            vec![
                Cell::text("5001234-56.2023.4.04.7000"),
                Cell::text("4"),
                Cell::text("FALSO"),
                Cell::text("SEC\nANALISAR (G) - Prazo (G)"),
                Cell::Number(2.0),
                Cell::DateTime(
                    NaiveDate::from_ymd_opt(2023, 2, 2)
                        .unwrap()
                        .and_hms_opt(11, 0, 0)
                        .unwrap()
                ),
            ]
        );
    }

    #[test]
    fn numeric_process_numbers_are_stringified() {
        let (map, schema) = layout(&["Número Processo"]);
        let out = transform_row(&[Cell::Number(1234567890.0)], &map, &schema);
        assert_eq!(out.cells[0], Cell::text("1234567890"));
        assert_eq!(out.cells[1], Cell::text("7"));
    }

    #[test]
    fn short_rows_are_padded_with_empty_text() {
        let (map, schema) = layout(&["Número Processo", "Localizadores", "Extra"]);
        let out = transform_row(&[Cell::text("123")], &map, &schema);
        assert_eq!(out.cells.len(), schema.len());
        assert_eq!(out.cells[1], Cell::text(""));
        assert_eq!(out.cells[3], Cell::text(""));
        assert_eq!(out.cells[4], Cell::Number(0.0));
        assert_eq!(out.cells[5], Cell::text(""));
    }

    #[test]
    fn unresolved_columns_degrade_to_defaults() {
        let (map, schema) = layout(&["A"]);
        let out = transform_row(&[Cell::text(" keep me ")], &map, &schema);
        assert_eq!(
            out.cells,
            vec![
                Cell::text(" keep me "),
                Cell::Number(0.0),
                Cell::text(""),
                Cell::text("FALSO"),
            ]
        );
    }

    #[test]
    fn unparseable_dates_pass_through() {
        let (map, schema) = layout(&["Inclusão no Localizador"]);
        let out = transform_row(&[Cell::text("sem data")], &map, &schema);
        assert_eq!(out.cells[0], Cell::text("sem data"));
    }

    #[test]
    fn byte_order_mark_is_trimmed_from_process_numbers() {
        let (map, schema) = layout(&["Número Processo"]);
        let out = transform_row(&[Cell::text("\u{feff}5001234-56.2023 ")], &map, &schema);
        assert_eq!(out.cells[0], Cell::text("5001234-56.2023"));
        assert_eq!(out.cells[1], Cell::text("4"));
    }

    #[test]
    fn input_row_is_not_mutated() {
        let (map, schema) = layout(&["Número Processo"]);
        let row = vec![Cell::text(" 1234567 ")];
        let _ = transform_row(&row, &map, &schema);
        assert_eq!(row[0], Cell::text(" 1234567 "));
    }

    #[test]
    fn digito_needs_seven_characters() {
        assert_eq!(digito_of("123456"), "");
        assert_eq!(digito_of("1234567"), "7");
        assert_eq!(digito_of(""), "");
    }
}
