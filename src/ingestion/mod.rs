//! Decoding spreadsheet files into raw grids.
//!
//! The engine in [`crate::processing`] is format-agnostic; this module is the thin shell that
//! turns files into [`crate::types::Grid`]s. Most callers should use [`ingest_from_path`] or
//! [`process_path`] (from [`unified`]), which:
//!
//! - auto-detect format by file extension (or you can override via [`IngestionOptions`])
//! - decode the first (or a named) sheet without interpreting headers
//! - optionally report success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver,
};
pub use unified::{ingest_from_path, process_path, IngestionFormat, IngestionOptions, SheetSelection};
