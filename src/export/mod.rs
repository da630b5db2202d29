//! Writing processed results back to spreadsheets.
//!
//! The `.xlsx` writer lives behind the `xlsx` feature; [`ExportOptions`] is always available so
//! callers can carry layout settings around without enabling it.

#[cfg(feature = "xlsx")]
pub mod xlsx;

#[cfg(feature = "xlsx")]
pub use xlsx::{to_xlsx_buffer, write_xlsx};

/// Layout of the exported workbook.
///
/// Use [`Default`] for the standard report layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Name of the single worksheet.
    pub sheet_name: String,
    /// Name of the Excel table spanning the data.
    pub table_name: String,
    /// Width of ordinary columns.
    pub default_width: f64,
    /// Width of the "Localizadores" column.
    pub locator_width: f64,
    /// Width of the "Último Evento" column.
    pub date_width: f64,
    /// Width of the "Feito" column.
    pub status_width: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Dados Processados".to_string(),
            table_name: "TabelaProcessos".to_string(),
            default_width: 20.0,
            locator_width: 60.0,
            date_width: 18.0,
            status_width: 15.0,
        }
    }
}
