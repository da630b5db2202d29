//! `locator-sheet-processing` cleans eproc "locator" reports: spreadsheet exports whose first
//! row is a technical banner and whose second row holds the real column headers.
//!
//! The core entrypoint is [`processing::process_rows`], which takes a raw [`types::Grid`] and
//! returns a [`types::ProcessResult`] with:
//!
//! - the process number trimmed, plus a derived "Dígito" column (7th character) and a "Feito"
//!   column defaulting to `FALSO`
//! - the locators text decoded from HTML entities, with `(Principal)` markers removed and one
//!   locator per line
//! - a "Localizadores do Gabinete" count of `(G)` markers
//! - "Inclusão no Localizador" / "Último Evento" parsed from `dd/mm/yyyy hh:mm[:ss]`
//!
//! The engine never returns `Err`: failures are carried in [`types::ProcessResult::error`].
//!
//! ## Quick example
//!
//! ```rust
//! use locator_sheet_processing::process_rows;
//! use locator_sheet_processing::types::{grid_from_strs, Cell};
//!
//! let grid = grid_from_strs([
//!     vec!["Relatório gerado em 01/02/2024"],
//!     vec!["Número Processo", "Localizadores"],
//!     vec!["  5001234-56.2023 ", "Cartório &amp; Cia - GABINETE (G) (Principal)"],
//! ]);
//!
//! let result = process_rows(&grid);
//! assert_eq!(
//!     result.headers,
//!     vec!["Número Processo", "Dígito", "Feito", "Localizadores", "Localizadores do Gabinete"]
//! );
//! assert_eq!(result.data[0][0], Cell::text("5001234-56.2023"));
//! assert_eq!(result.data[0][3], Cell::text("Cartório & Cia\nGABINETE (G)"));
//! assert_eq!(result.data[0][4], Cell::Number(1.0));
//! ```
//!
//! ## Reading files
//!
//! ```no_run
//! use locator_sheet_processing::ingestion::{process_path, IngestionOptions};
//! use locator_sheet_processing::processing::ProcessOptions;
//!
//! # fn main() -> Result<(), locator_sheet_processing::IngestionError> {
//! // Auto-detects by extension (.csv/.json/.xlsx/...).
//! let result = process_path("relatorio.csv", &IngestionOptions::default(), &ProcessOptions::default())?;
//! println!("rows={}", result.row_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`processing`]: header discovery, schema construction and per-row normalization
//! - [`execution`]: the same pipeline on a rayon pool, with throttling and metrics
//! - [`ingestion`]: CSV / JSON / Excel (feature `excel`) decoding into grids
//! - [`export`]: `.xlsx` rendering of results (feature `xlsx`)
//! - [`types`]: cells, grids, column maps and results
//! - [`error`]: error types used across the crate

pub mod error;
pub mod execution;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{IngestionError, IngestionResult, ProcessingError};
pub use processing::process_rows;
pub use types::{Cell, Grid, ProcessResult};
