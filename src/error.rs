use thiserror::Error;

/// Convenience result type for ingestion and export operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Failures of the row-processing engine.
///
/// [`crate::processing::process_rows`] never returns these directly; it folds them into
/// [`crate::types::ProcessResult::error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// The grid has fewer than two rows.
    #[error("file empty or insufficient rows")]
    EmptyInput,

    /// Nothing is left once the technical first row is dropped.
    #[error("no data after removing header row")]
    NoDataRows,

    /// A runtime fault while resolving headers or transforming rows.
    #[error("{message}")]
    Internal { message: String },
}

/// Error type returned by ingestion and export functions.
///
/// A single error enum shared across CSV/JSON (and optional Excel) ingestion and `.xlsx` export.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[cfg(feature = "xlsx")]
    /// Workbook export error (feature-gated behind `xlsx`).
    #[error("xlsx export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// The input format could not be determined or is not enabled.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// A grid row could not be represented as a sequence of cells.
    #[error("malformed row {row}: {message}")]
    MalformedRow { row: usize, message: String },

    /// Processing reported an error, so there is nothing to export.
    #[error("processing failed: {0}")]
    Processing(#[from] ProcessingError),
}
