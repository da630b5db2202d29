//! Brazilian (`DD/MM/YYYY[ HH:MM:SS]`) date parsing.

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::Cell;

/// Parse `DD/MM/YYYY[ HH:MM[:SS]]` into a naive date-time.
///
/// - Only the first two space-separated segments are considered (date, then time).
/// - Missing time components default to `0`.
/// - Two-digit years (`0..=99`) are read as `19xx`, like spreadsheet date functions do.
/// - Returns `None` for missing or non-numeric components and for zero day/month/year.
/// - Out-of-range components are rejected, not rolled over into the next month or day the way a
///   JavaScript `Date` would: `31/02/2023` and `01/01/2023 24:30` return `None` (and stay text in
///   [`parse_date_cell`]) instead of becoming `03/03/2023` and `02/01/2023 00:30`.
pub fn parse_brazilian_datetime(input: &str) -> Option<NaiveDateTime> {
    let mut segments = input.split(' ');
    let date_part = segments.next().filter(|s| !s.is_empty())?;
    let time_part = segments.next().unwrap_or("");

    let mut date_fields = date_part.split('/');
    let day = parse_component(date_fields.next()?)?;
    let month = parse_component(date_fields.next()?)?;
    let year = parse_component(date_fields.next()?)?;
    if day == 0 || month == 0 || year == 0 {
        return None;
    }
    let year = if year < 100 { year + 1900 } else { year };

    let (mut hour, mut minute, mut second) = (0, 0, 0);
    if !time_part.is_empty() {
        let mut time_fields = time_part.split(':');
        for slot in [&mut hour, &mut minute, &mut second] {
            match time_fields.next() {
                Some(raw) => *slot = parse_component(raw)?,
                None => break,
            }
        }
    }

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?.and_hms_opt(hour, minute, second)
}

/// Replace a Brazilian date string with a [`Cell::DateTime`].
///
/// Anything that is not a text cell, or text that does not parse, is returned unchanged.
pub fn parse_date_cell(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => parse_brazilian_datetime(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| cell.clone()),
        other => other.clone(),
    }
}

fn parse_component(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
