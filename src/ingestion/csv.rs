//! CSV ingestion into a raw [`Grid`].

use std::io::Read;
use std::path::Path;

use crate::error::IngestionResult;
use crate::types::{Cell, Grid};

/// Ingest a CSV file into a raw [`Grid`].
///
/// Rules:
///
/// - No header interpretation: the first record becomes row 0 of the grid.
/// - Records may have different lengths.
/// - Empty fields become [`Cell::Blank`]; everything else is [`Cell::Text`], untrimmed.
/// - When `delimiter` is `None` it is sniffed from the first lines (`;` or `,`).
pub fn ingest_csv_from_path(path: impl AsRef<Path>, delimiter: Option<u8>) -> IngestionResult<Grid> {
    let bytes = std::fs::read(path)?;
    ingest_csv_from_bytes(&bytes, delimiter)
}

/// Ingest CSV from an in-memory buffer.
pub fn ingest_csv_from_bytes(input: &[u8], delimiter: Option<u8>) -> IngestionResult<Grid> {
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(input));
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(input);
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader should be built with `has_headers(false)` and `flexible(true)`; otherwise the first
/// record is swallowed as headers and ragged rows are rejected.
pub fn ingest_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Grid> {
    let mut grid = Grid::new();
    for result in rdr.records() {
        let record = result?;
        grid.push(record.iter().map(field_to_cell).collect());
    }
    Ok(grid)
}

fn field_to_cell(raw: &str) -> Cell {
    if raw.is_empty() {
        Cell::Blank
    } else {
        Cell::text(raw)
    }
}

/// Lines inspected when sniffing; the banner row alone often has no delimiter at all.
const SNIFF_LINES: usize = 5;

/// Pick `;` when the leading lines have more semicolons than commas.
fn sniff_delimiter(input: &[u8]) -> u8 {
    let (mut semis, mut commas) = (0usize, 0usize);
    for line in input.split(|&b| b == b'\n').take(SNIFF_LINES) {
        semis += line.iter().filter(|&&b| b == b';').count();
        commas += line.iter().filter(|&&b| b == b',').count();
    }
    if semis > commas { b';' } else { b',' }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_ragged_records_without_headers() {
        let grid = ingest_csv_from_bytes(b"Relatorio\nA,B,C\n1,,3\n", None).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec![Cell::text("Relatorio")]);
        assert_eq!(grid[2], vec![Cell::text("1"), Cell::Blank, Cell::text("3")]);
    }

    #[test]
    fn sniffs_semicolon_delimiter() {
        let grid = ingest_csv_from_bytes("x\nNúmero Processo;Localizadores\n123;\"A, B\"\n".as_bytes(), None).unwrap();
        assert_eq!(grid[1].len(), 2);
        assert_eq!(grid[2][1], Cell::text("A, B"));
    }

    #[test]
    fn explicit_delimiter_wins() {
        let grid = ingest_csv_from_bytes(b"a|b;c\n", Some(b'|')).unwrap();
        assert_eq!(grid[0], vec![Cell::text("a"), Cell::text("b;c")]);
    }
}
