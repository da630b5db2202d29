//! JSON ingestion into a raw [`Grid`].
//!
//! The accepted shape is what spreadsheet decoders emit in "array of arrays" mode:
//! `[["banner"], ["Número Processo", "Localizadores"], ["123", "A - B"]]`.

use std::fs;
use std::path::Path;

use serde_json::Value as JsonValue;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Cell, Grid};

/// Ingest a JSON file into a [`Grid`].
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> IngestionResult<Grid> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest JSON from an in-memory string.
///
/// Every element of the top-level array must itself be an array; anything else is reported as
/// [`IngestionError::MalformedRow`] rather than being passed through as a ragged row.
pub fn ingest_json_from_str(input: &str) -> IngestionResult<Grid> {
    let value: JsonValue = serde_json::from_str(input)?;
    let JsonValue::Array(rows) = value else {
        return Err(IngestionError::UnsupportedFormat {
            message: "json grid must be an array of rows".to_string(),
        });
    };

    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| match row {
            JsonValue::Array(cells) => Ok(cells.into_iter().map(json_to_cell).collect()),
            other => Err(IngestionError::MalformedRow {
                row: idx,
                message: format!("expected an array of cells, got {}", json_kind(&other)),
            }),
        })
        .collect()
}

fn json_to_cell(v: JsonValue) -> Cell {
    match v {
        JsonValue::Null => Cell::Blank,
        JsonValue::Bool(b) => Cell::Bool(b),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or_else(|| Cell::Text(n.to_string())),
        JsonValue::String(s) => Cell::Text(s),
        nested @ (JsonValue::Array(_) | JsonValue::Object(_)) => Cell::Text(nested.to_string()),
    }
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_json_primitives_to_cells() {
        let grid = ingest_json_from_str(r#"[["t"], ["a", 1, true, null, {"k": 1}]]"#).unwrap();
        assert_eq!(
            grid[1],
            vec![
                Cell::text("a"),
                Cell::Number(1.0),
                Cell::Bool(true),
                Cell::Blank,
                Cell::text(r#"{"k":1}"#),
            ]
        );
    }

    #[test]
    fn non_array_rows_are_a_distinct_diagnostic() {
        let err = ingest_json_from_str(r#"[["t"], "oops", ["x"]]"#).unwrap_err();
        match err {
            IngestionError::MalformedRow { row, message } => {
                assert_eq!(row, 1);
                assert!(message.contains("a string"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn top_level_must_be_an_array() {
        let err = ingest_json_from_str(r#"{"rows": []}"#).unwrap_err();
        assert!(matches!(err, IngestionError::UnsupportedFormat { .. }));
    }
}
