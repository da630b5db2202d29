#![cfg(feature = "xlsx")]

//! `.xlsx` rendering of a [`ProcessResult`].
//!
//! The workbook holds a single sheet with an Excel table over the processed rows, column widths
//! and alignment tuned for the locator report, a `Sim`/`Não` drop-down on the "Feito" column, and
//! a green highlight for rows marked as done.

use std::path::Path;

use rust_xlsxwriter::{
    Color, ConditionalFormatFormula, DataValidation, ExcelDateTime, Format, FormatAlign, FormatBorder, Table,
    TableColumn, TableStyle, Workbook, Worksheet,
};

use crate::error::{IngestionError, IngestionResult, ProcessingError};
use crate::types::{Cell, ProcessResult};

use super::ExportOptions;

/// Value of the "Feito" drop-down that marks a row as done.
pub const DONE_VALUE: &str = "Sim";

const NOT_DONE_VALUE: &str = "Não";
const HIGHLIGHT_FILL: u32 = 0xC6EFCE;
const HIGHLIGHT_TEXT: u32 = 0x006100;
const DATETIME_FORMAT: &str = "dd/mm/yyyy hh:mm:ss";

/// How a column is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Plain,
    Locators,
    LastEvent,
    Status,
}

/// Write `result` to `path`.
pub fn write_xlsx(result: &ProcessResult, path: impl AsRef<Path>, options: &ExportOptions) -> IngestionResult<()> {
    let mut workbook = build_workbook(result, options)?;
    workbook.save(path)?;
    Ok(())
}

/// Render `result` into an in-memory `.xlsx` file.
pub fn to_xlsx_buffer(result: &ProcessResult, options: &ExportOptions) -> IngestionResult<Vec<u8>> {
    let mut workbook = build_workbook(result, options)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(result: &ProcessResult, options: &ExportOptions) -> IngestionResult<Workbook> {
    if let Some(message) = &result.error {
        return Err(ProcessingError::Internal {
            message: message.clone(),
        }
        .into());
    }
    if result.headers.is_empty() {
        return Err(IngestionError::UnsupportedFormat {
            message: "nothing to export: result has no columns".to_string(),
        });
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&options.sheet_name)?;

    let kinds = classify_columns(&result.headers);
    let formats: Vec<Format> = kinds.iter().map(|k| column_format(*k)).collect();
    let datetime_format = Format::new()
        .set_num_format(DATETIME_FORMAT)
        .set_text_wrap()
        .set_align(FormatAlign::VerticalCenter)
        .set_align(FormatAlign::Center);

    for (col, (kind, format)) in kinds.iter().zip(&formats).enumerate() {
        let col = col_num(col)?;
        worksheet.set_column_width(col, column_width(*kind, options))?;
        worksheet.set_column_format(col, format)?;
    }

    for (r, row) in result.data.iter().enumerate() {
        let excel_row = row_num(r + 1)?;
        for (c, cell) in row.iter().enumerate().take(result.headers.len()) {
            let date_format = if kinds[c] == ColumnKind::LastEvent {
                &formats[c]
            } else {
                &datetime_format
            };
            write_cell(worksheet, excel_row, col_num(c)?, cell, &formats[c], date_format)?;
        }
    }

    let last_col = col_num(result.headers.len() - 1)?;
    // An Excel table needs at least one body row.
    let last_row = row_num(result.data.len().max(1))?;

    let columns: Vec<TableColumn> = table_headers(&result.headers)
        .into_iter()
        .map(|h| TableColumn::new().set_header(h))
        .collect();
    let table = Table::new()
        .set_name(&options.table_name)
        .set_style(TableStyle::Medium2)
        .set_banded_rows(true)
        .set_autofilter(true)
        .set_columns(&columns);
    worksheet.add_table(0, 0, last_row, last_col, &table)?;

    if let Some(status_col) = kinds.iter().position(|k| *k == ColumnKind::Status) {
        let status_col = col_num(status_col)?;
        let validation = DataValidation::new().allow_list_strings(&[DONE_VALUE, NOT_DONE_VALUE])?;
        worksheet.add_data_validation(1, status_col, last_row, status_col, &validation)?;

        let highlight = Format::new()
            .set_background_color(Color::RGB(HIGHLIGHT_FILL))
            .set_font_color(Color::RGB(HIGHLIGHT_TEXT))
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::RGB(HIGHLIGHT_TEXT));
        let rule = format!("=${}2=\"{DONE_VALUE}\"", column_letter(status_col));
        let conditional = ConditionalFormatFormula::new()
            .set_rule(rule.as_str())
            .set_format(highlight);
        worksheet.add_conditional_format(1, 0, last_row, last_col, &conditional)?;
    }

    Ok(workbook)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    format: &Format,
    date_format: &Format,
) -> IngestionResult<()> {
    match cell {
        Cell::Blank => {}
        Cell::Text(s) if s.is_empty() => {}
        Cell::Text(s) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        Cell::Number(n) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        Cell::Bool(b) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        Cell::DateTime(dt) => {
            let excel_dt = to_excel_datetime(dt)?;
            worksheet.write_datetime_with_format(row, col, &excel_dt, date_format)?;
        }
    }
    Ok(())
}

fn to_excel_datetime(dt: &chrono::NaiveDateTime) -> IngestionResult<ExcelDateTime> {
    use chrono::{Datelike, Timelike};

    let out_of_range = || IngestionError::UnsupportedFormat {
        message: format!("date {dt} cannot be represented in a workbook"),
    };
    let year = u16::try_from(dt.year()).map_err(|_| out_of_range())?;
    Ok(ExcelDateTime::from_ymd(year, dt.month() as u8, dt.day() as u8)?.and_hms(
        dt.hour() as u16,
        dt.minute() as u8,
        dt.second(),
    )?)
}

/// Locators, last-event and status columns get special treatment; the first match wins.
fn classify_columns(headers: &[String]) -> Vec<ColumnKind> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let locators = lowered.iter().position(|h| h.contains("localizadores"));
    let last_event = lowered.iter().position(|h| h.contains("último evento"));
    let status = lowered.iter().position(|h| h == "feito");

    (0..headers.len())
        .map(|i| {
            if Some(i) == locators {
                ColumnKind::Locators
            } else if Some(i) == last_event {
                ColumnKind::LastEvent
            } else if Some(i) == status {
                ColumnKind::Status
            } else {
                ColumnKind::Plain
            }
        })
        .collect()
}

fn column_width(kind: ColumnKind, options: &ExportOptions) -> f64 {
    match kind {
        ColumnKind::Plain => options.default_width,
        ColumnKind::Locators => options.locator_width,
        ColumnKind::LastEvent => options.date_width,
        ColumnKind::Status => options.status_width,
    }
}

fn column_format(kind: ColumnKind) -> Format {
    let base = Format::new().set_text_wrap().set_align(FormatAlign::VerticalCenter);
    match kind {
        ColumnKind::Plain | ColumnKind::Locators => base.set_align(FormatAlign::Left),
        ColumnKind::LastEvent => base.set_align(FormatAlign::Center).set_num_format("dd/mm/yyyy"),
        ColumnKind::Status => base.set_align(FormatAlign::Center),
    }
}

/// Excel tables need non-empty, unique column names.
fn table_headers(headers: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for (i, h) in headers.iter().enumerate() {
        let base = if h.trim().is_empty() { format!("Coluna{}", i + 1) } else { h.clone() };
        let mut name = base.clone();
        let mut n = 2;
        while seen.iter().any(|s| s.to_lowercase() == name.to_lowercase()) {
            name = format!("{base} ({n})");
            n += 1;
        }
        seen.push(name);
    }
    seen
}

/// Spreadsheet column letters: 0 -> "A", 25 -> "Z", 26 -> "AA".
fn column_letter(col: u16) -> String {
    let mut n = u32::from(col) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn col_num(col: usize) -> IngestionResult<u16> {
    u16::try_from(col).map_err(|_| IngestionError::UnsupportedFormat {
        message: format!("column {col} exceeds the worksheet limit"),
    })
}

fn row_num(row: usize) -> IngestionResult<u32> {
    u32::try_from(row).map_err(|_| IngestionError::UnsupportedFormat {
        message: format!("row {row} exceeds the worksheet limit"),
    })
}
