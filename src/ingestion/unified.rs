//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which decodes a file into a raw
//! [`crate::types::Grid`], or [`process_path`], which also runs the engine on it.
//!
//! - If [`IngestionOptions::format`] is `None`, the ingestion format is inferred from the file
//!   extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::processing::{process_rows_with, ProcessOptions};
use crate::types::{Grid, ProcessResult};

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma- or semicolon-separated values.
    Csv,
    /// JSON array of row arrays.
    Json,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Which worksheet to read from a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelection {
    /// The first sheet (default).
    #[default]
    First,
    /// A single named sheet.
    Named(String),
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Excel-specific options.
    pub sheet: SheetSelection,
    /// CSV field delimiter; sniffed from the input when `None`.
    pub csv_delimiter: Option<u8>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("sheet", &self.sheet)
            .field("csv_delimiter", &self.csv_delimiter.map(char::from))
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            sheet: SheetSelection::default(),
            csv_delimiter: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Decode `path` into a raw [`Grid`].
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use std::sync::Arc;
///
/// use locator_sheet_processing::ingestion::{ingest_from_path, IngestionOptions, StdErrObserver};
///
/// # fn main() -> Result<(), locator_sheet_processing::IngestionError> {
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(StdErrObserver)),
///     ..Default::default()
/// };
/// let grid = ingest_from_path("relatorio.csv", &opts)?;
/// println!("rows={}", grid.len());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<Grid> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path, options.csv_delimiter),
        IngestionFormat::Json => json::ingest_json_from_path(path),
        IngestionFormat::Excel => ingest_excel_dispatch(path, &options.sheet),
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(grid) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: grid.len(),
                    max_columns: grid.iter().map(Vec::len).max().unwrap_or(0),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

/// Decode `path` and run [`crate::processing::process_rows`] on it.
///
/// Decoding failures are returned as `Err`; processing failures are carried in
/// [`ProcessResult::error`] like any other call to the engine.
pub fn process_path(
    path: impl AsRef<Path>,
    ingestion: &IngestionOptions,
    processing: &ProcessOptions,
) -> IngestionResult<ProcessResult> {
    let grid = ingest_from_path(path, ingestion)?;
    Ok(process_rows_with(&grid, processing))
}

fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Json(err) if err.is_io() => IngestionSeverity::Critical,
        _ => IngestionSeverity::Error,
    }
}

fn infer_format_from_path(path: &Path) -> IngestionResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::UnsupportedFormat {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat {
        message: format!(
            "only Excel (.xlsx, .xls) or CSV files are accepted; got '{ext}' ({})",
            path.display()
        ),
    })
}

fn ingest_excel_dispatch(path: &Path, sheet: &SheetSelection) -> IngestionResult<Grid> {
    #[cfg(feature = "excel")]
    {
        let name = match sheet {
            SheetSelection::First => None,
            SheetSelection::Named(name) => Some(name.as_str()),
        };
        super::excel::ingest_excel_from_path(path, name)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (path, sheet);
        Err(IngestionError::UnsupportedFormat {
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
