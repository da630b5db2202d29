#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDateTime;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Cell, Grid};

/// Ingest one sheet of an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into a raw [`Grid`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Every row of the used range becomes a grid row, starting with the technical banner row
/// - Trailing empty cells are dropped, so rows are as long as their last non-empty cell
/// - Excel date-times become [`Cell::DateTime`]; error cells become their display text
pub fn ingest_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> IngestionResult<Grid> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestionError::UnsupportedFormat {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    Ok(range_to_grid(&range))
}

/// Convert a calamine range into grid rows.
pub fn range_to_grid(range: &Range<Data>) -> Grid {
    range
        .rows()
        .map(|row| {
            let len = row
                .iter()
                .rposition(|c| !matches!(c, Data::Empty))
                .map_or(0, |last| last + 1);
            row[..len].iter().map(convert_cell).collect()
        })
        .collect()
}

fn convert_cell(c: &Data) -> Cell {
    match c {
        Data::Empty => Cell::Blank,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => s
            .parse::<NaiveDateTime>()
            .map(Cell::DateTime)
            .unwrap_or_else(|_| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}
