//! Core data model types for the locator-report engine.
//!
//! A raw spreadsheet arrives as an untyped [`Grid`] of [`Cell`]s. The engine resolves the
//! semantic columns it cares about into a [`ColumnMap`], computes the output schema as an ordered
//! list of [`HeaderDefinition`]s, and returns a [`ProcessResult`].

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// A single spreadsheet value.
///
/// The grid itself enforces no type; decoders produce whichever variant fits the source cell.
///
/// Cells serialize untagged (text as a string, dates as ISO 8601 strings), so the encoding is
/// one-way: an ISO-looking text and a date-time serialize the same. Grids are read through
/// [`crate::ingestion`], never deserialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing/empty value.
    #[default]
    Blank,
    /// Boolean.
    Bool(bool),
    /// Numeric value (spreadsheets store every number as a double).
    Number(f64),
    /// Date-time value without timezone.
    DateTime(NaiveDateTime),
    /// UTF-8 string.
    Text(String),
}

impl Cell {
    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns `true` for cells that carry no usable content.
    ///
    /// Blank cells, empty strings, `0`/`NaN` numbers and `false` all count as blank. Cleaning and
    /// derivation steps skip blank cells.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Blank => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(n) => *n == 0.0 || n.is_nan(),
            Cell::Bool(b) => !b,
            Cell::DateTime(_) => false,
        }
    }

    /// Borrow the string payload of a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Borrow the payload of a date-time cell.
    pub fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Cell::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Stringify the cell.
    ///
    /// Integral numbers render without a fractional part, so a process number stored as
    /// `1234567890.0` becomes `"1234567890"`.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Blank => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%d/%m/%Y %H:%M:%S")),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(dt: NaiveDateTime) -> Self {
        Cell::DateTime(dt)
    }
}

/// Row-major raw spreadsheet content. Rows may have different lengths.
pub type Grid = Vec<Vec<Cell>>;

/// Build a [`Grid`] from string literals. Handy in tests and examples.
pub fn grid_from_strs<R, S>(rows: R) -> Grid
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(|s| Cell::text(s.as_ref())).collect())
        .collect()
}

/// Semantic column roles the engine looks for in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    /// "Número Processo".
    ProcessNumber,
    /// "Localizadores".
    Locators,
    /// "Inclusão no Localizador".
    InclusionDate,
    /// "Último Evento".
    LastEventDate,
}

impl ColumnRole {
    /// All roles, in resolution order.
    pub const ALL: [ColumnRole; 4] = [
        ColumnRole::ProcessNumber,
        ColumnRole::Locators,
        ColumnRole::InclusionDate,
        ColumnRole::LastEventDate,
    ];

    /// Lower-case literal a header must contain to satisfy this role.
    pub fn needle(self) -> &'static str {
        match self {
            ColumnRole::ProcessNumber => "número processo",
            ColumnRole::Locators => "localizadores",
            ColumnRole::InclusionDate => "inclusão no localizador",
            ColumnRole::LastEventDate => "último evento",
        }
    }
}

/// Physical column index per [`ColumnRole`]; `None` means no header matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub process_number: Option<usize>,
    pub locators: Option<usize>,
    pub inclusion_date: Option<usize>,
    pub last_event_date: Option<usize>,
}

impl ColumnMap {
    /// Resolved index for `role`, if any.
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        match role {
            ColumnRole::ProcessNumber => self.process_number,
            ColumnRole::Locators => self.locators,
            ColumnRole::InclusionDate => self.inclusion_date,
            ColumnRole::LastEventDate => self.last_event_date,
        }
    }

    /// Set the resolved index for `role`.
    pub fn set(&mut self, role: ColumnRole, index: Option<usize>) {
        match role {
            ColumnRole::ProcessNumber => self.process_number = index,
            ColumnRole::Locators => self.locators = index,
            ColumnRole::InclusionDate => self.inclusion_date = index,
            ColumnRole::LastEventDate => self.last_event_date = index,
        }
    }

    /// Roles for which no header matched.
    pub fn unresolved(&self) -> impl Iterator<Item = ColumnRole> + '_ {
        ColumnRole::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none())
    }
}

/// Columns computed by the engine rather than read from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedColumn {
    /// Count of `(G)` markers in the locator text.
    GabineteCount,
    /// Seventh character of the process number.
    Digito,
    /// User-editable status flag, initialized to `"FALSO"`.
    Feito,
}

impl DerivedColumn {
    /// Output header for this column.
    pub fn header_name(self) -> &'static str {
        match self {
            DerivedColumn::GabineteCount => "Localizadores do Gabinete",
            DerivedColumn::Digito => "Dígito",
            DerivedColumn::Feito => "Feito",
        }
    }
}

/// One column of the output schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderDefinition {
    /// Column copied from the input at physical index `index`.
    Existing { name: String, index: usize },
    /// Column computed per row.
    Derived { name: String, column: DerivedColumn },
}

impl HeaderDefinition {
    /// Build a derived definition using the column's canonical header.
    pub fn derived(column: DerivedColumn) -> Self {
        Self::Derived {
            name: column.header_name().to_string(),
            column,
        }
    }

    /// Output header name.
    pub fn name(&self) -> &str {
        match self {
            HeaderDefinition::Existing { name, .. } | HeaderDefinition::Derived { name, .. } => name,
        }
    }

    /// Source index for existing columns.
    pub fn existing_index(&self) -> Option<usize> {
        match self {
            HeaderDefinition::Existing { index, .. } => Some(*index),
            HeaderDefinition::Derived { .. } => None,
        }
    }
}

/// Outcome of [`crate::processing::process_rows`].
///
/// Exactly one of (`headers` + `data`) or `error` is meaningful. On failure `headers` and `data`
/// are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessResult {
    /// Ordered output column names.
    pub headers: Vec<String>,
    /// Output rows; each has `headers.len()` cells.
    pub data: Vec<Vec<Cell>>,
    /// Human-readable failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessResult {
    /// A failed result carrying `error`'s message.
    pub fn failure(error: impl fmt::Display) -> Self {
        Self {
            headers: Vec::new(),
            data: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// `true` when no error was reported.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Position of the header named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.data.len()
    }
}
