//! The row/header transformation engine.
//!
//! The engine takes a raw [`crate::types::Grid`] whose first row is a technical banner and whose
//! second row holds the real headers, and produces a [`crate::types::ProcessResult`]:
//!
//! - [`headers::resolve_columns`]: finds the process-number, locators, inclusion-date and
//!   last-event columns by case-insensitive substring match
//! - [`schema::build_schema`]: inserts "Dígito"/"Feito" after the process number and
//!   "Localizadores do Gabinete" after the locators column
//! - [`rows::transform_row`]: trims process numbers, normalizes locator text
//!   ([`locators`]), parses Brazilian dates ([`dates`]) and fills the derived columns
//! - [`process_rows`]: sequences the above and turns failures into `ProcessResult::error`
//!
//! ## Example
//!
//! ```rust
//! use locator_sheet_processing::processing::process_rows;
//! use locator_sheet_processing::types::{grid_from_strs, Cell};
//!
//! let grid = grid_from_strs([
//!     vec!["Ignore", "Me"],
//!     vec!["Número Processo", "Other", "Localizadores", "Inclusão no Localizador", "Último Evento"],
//!     vec!["1234567890", "Data", "Loc A - TESTE (G)", "01/01/2023 10:00", "02/02/2023 11:00"],
//! ]);
//!
//! let result = process_rows(&grid);
//! assert!(result.error.is_none());
//!
//! let digito = result.column_index("Dígito").unwrap();
//! let feito = result.column_index("Feito").unwrap();
//! let gabinete = result.column_index("Localizadores do Gabinete").unwrap();
//! assert_eq!(result.data[0][digito], Cell::text("7"));
//! assert_eq!(result.data[0][feito], Cell::text("FALSO"));
//! assert_eq!(result.data[0][gabinete], Cell::Number(1.0));
//!
//! let inclusao = result.column_index("Inclusão no Localizador").unwrap();
//! assert!(result.data[0][inclusao].as_datetime().is_some());
//! ```

pub mod dates;
pub mod entities;
pub mod headers;
pub mod locators;
mod observer;
mod pipeline;
pub mod rows;
pub mod schema;

pub use observer::{ProcessObserver, ProcessOptions, ProcessStats, StdErrProcessObserver};
pub use pipeline::{plan_rows, process_rows, process_rows_with, try_process_rows, ProcessOutput, RowPlan};

pub(crate) use pipeline::catch_internal;
