//! The `processRows` orchestrator.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::ProcessingError;
use crate::types::{Cell, ColumnMap, HeaderDefinition, ProcessResult};

use super::headers::resolve_columns;
use super::observer::{ProcessOptions, ProcessStats};
use super::rows::{transform_row, TransformedRow};
use super::schema::{build_schema, header_names};

/// Everything needed to transform the data rows of one grid.
///
/// Built by [`plan_rows`]; shared read-only across workers by the parallel engine.
#[derive(Debug, Clone)]
pub struct RowPlan<'a> {
    /// Resolved column roles.
    pub columns: ColumnMap,
    /// Output schema.
    pub schema: Vec<HeaderDefinition>,
    /// Data rows (technical row and header row already removed).
    pub rows: &'a [Vec<Cell>],
}

impl RowPlan<'_> {
    /// Output header names.
    pub fn headers(&self) -> Vec<String> {
        header_names(&self.schema)
    }

    /// Transform one row according to this plan.
    pub fn transform(&self, row: &[Cell]) -> TransformedRow {
        transform_row(row, &self.columns, &self.schema)
    }
}

/// Successful output of [`try_process_rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    pub headers: Vec<String>,
    pub data: Vec<Vec<Cell>>,
    pub stats: ProcessStats,
}

impl From<ProcessOutput> for ProcessResult {
    fn from(out: ProcessOutput) -> Self {
        ProcessResult {
            headers: out.headers,
            data: out.data,
            error: None,
        }
    }
}

/// Check preconditions, drop the technical row, resolve columns and build the schema.
///
/// Row 0 is discarded unread, row 1 is the header row, the remainder are data rows.
pub fn plan_rows(grid: &[Vec<Cell>]) -> Result<RowPlan<'_>, ProcessingError> {
    if grid.len() < 2 {
        return Err(ProcessingError::EmptyInput);
    }
    let (header_row, rows) = grid[1..].split_first().ok_or(ProcessingError::NoDataRows)?;

    let columns = resolve_columns(header_row);
    let schema = build_schema(header_row, &columns);
    Ok(RowPlan {
        columns,
        schema,
        rows,
    })
}

/// Run the full pipeline, returning a typed error on failure.
///
/// Panics raised while planning or transforming are caught and reported as [`ProcessingError::Internal`].
pub fn try_process_rows(grid: &[Vec<Cell>]) -> Result<ProcessOutput, ProcessingError> {
    try_process_rows_with(grid, &ProcessOptions::default())
}

fn try_process_rows_with(grid: &[Vec<Cell>], options: &ProcessOptions) -> Result<ProcessOutput, ProcessingError> {
    catch_internal(|| -> Result<ProcessOutput, ProcessingError> {
        let plan = plan_rows(grid)?;
        if let Some(obs) = options.observer.as_ref() {
            for role in plan.columns.unresolved() {
                obs.on_unresolved(role);
            }
        }

        let mut gabinete_total = 0;
        let data: Vec<Vec<Cell>> = plan
            .rows
            .iter()
            .map(|row| {
                let out = plan.transform(row);
                gabinete_total += out.gabinete_count;
                out.cells
            })
            .collect();

        let headers = plan.headers();
        let stats = ProcessStats {
            data_rows: data.len(),
            output_columns: headers.len(),
            gabinete_total,
        };
        Ok(ProcessOutput { headers, data, stats })
    })
    .and_then(|output| output)
}

/// Process a raw grid into a [`ProcessResult`].
///
/// Never fails: precondition violations and internal faults are reported through
/// [`ProcessResult::error`], with empty `headers`/`data`.
///
/// ```rust
/// use locator_sheet_processing::processing::process_rows;
/// use locator_sheet_processing::types::{grid_from_strs, Cell};
///
/// let grid = grid_from_strs([
///     vec!["Relatório"],
///     vec!["Número Processo", "Localizadores"],
///     vec!["1234567890", "Loc A - TESTE (G)"],
/// ]);
/// let result = process_rows(&grid);
/// assert!(result.is_ok());
/// assert_eq!(
///     result.headers,
///     vec!["Número Processo", "Dígito", "Feito", "Localizadores", "Localizadores do Gabinete"]
/// );
/// assert_eq!(result.data[0][1], Cell::text("7"));
/// assert_eq!(result.data[0][3], Cell::text("Loc A\nTESTE (G)"));
/// assert_eq!(result.data[0][4], Cell::Number(1.0));
/// ```
pub fn process_rows(grid: &[Vec<Cell>]) -> ProcessResult {
    process_rows_with(grid, &ProcessOptions::default())
}

/// [`process_rows`] with an observer.
pub fn process_rows_with(grid: &[Vec<Cell>], options: &ProcessOptions) -> ProcessResult {
    let result = try_process_rows_with(grid, options);
    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(out) => obs.on_success(&out.stats),
            Err(e) => obs.on_failure(e),
        }
    }
    match result {
        Ok(out) => out.into(),
        Err(e) => ProcessResult::failure(e),
    }
}

/// Run `f`, converting a panic into [`ProcessingError::Internal`].
pub(crate) fn catch_internal<T>(f: impl FnOnce() -> T) -> Result<T, ProcessingError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| ProcessingError::Internal {
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown internal error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::processing::ProcessObserver;
    use crate::types::{grid_from_strs, ColumnRole};

    /// Refuses reports with missing columns by panicking, and records what it was told.
    #[derive(Default)]
    struct StrictObserver {
        failures: Mutex<Vec<ProcessingError>>,
    }

    impl ProcessObserver for StrictObserver {
        fn on_unresolved(&self, role: ColumnRole) {
            panic!("missing column {:?}", role.needle());
        }

        fn on_failure(&self, error: &ProcessingError) {
            self.failures.lock().unwrap().push(error.clone());
        }
    }

    #[test]
    fn fewer_than_two_rows_is_empty_input() {
        assert_eq!(plan_rows(&[]).unwrap_err(), ProcessingError::EmptyInput);
        let one = grid_from_strs([["only"]]);
        assert_eq!(plan_rows(&one).unwrap_err(), ProcessingError::EmptyInput);
    }

    #[test]
    fn header_only_grid_has_no_data_rows() {
        let grid = grid_from_strs([vec!["tech"], vec!["Número Processo"]]);
        let out = try_process_rows(&grid).unwrap();
        assert!(out.data.is_empty());
        assert_eq!(out.headers, vec!["Número Processo", "Dígito", "Feito", "Localizadores do Gabinete"]);
    }

    #[test]
    fn technical_row_is_never_inspected() {
        let grid = grid_from_strs([vec!["Número Processo", "Localizadores"], vec!["A"], vec!["x"]]);
        let out = try_process_rows(&grid).unwrap();
        assert_eq!(out.headers, vec!["A", "Localizadores do Gabinete", "Dígito", "Feito"]);
    }

    #[test]
    fn running_total_sums_markers_across_rows() {
        let grid = grid_from_strs([
            vec!["tech"],
            vec!["Localizadores"],
            vec!["a (G) - b (G)"],
            vec!["c"],
            vec!["(G)"],
        ]);
        let out = try_process_rows(&grid).unwrap();
        assert_eq!(out.stats.gabinete_total, 3);
        assert_eq!(out.stats.data_rows, 3);
        assert_eq!(out.stats.output_columns, 4);
    }

    #[test]
    fn panics_become_internal_errors() {
        let err = catch_internal(|| -> usize { panic!("boom at row 3") }).unwrap_err();
        assert_eq!(
            err,
            ProcessingError::Internal {
                message: "boom at row 3".to_string()
            }
        );
        assert_eq!(ProcessResult::failure(err).error.as_deref(), Some("boom at row 3"));
    }

    #[test]
    fn panics_while_planning_become_internal_errors() {
        let grid = grid_from_strs([vec!["tech"], vec!["Número Processo"], vec!["5001234-56.2023"]]);
        let observer = Arc::new(StrictObserver::default());
        let options = ProcessOptions {
            observer: Some(observer.clone()),
        };

        let result = process_rows_with(&grid, &options);

        assert!(result.headers.is_empty() && result.data.is_empty());
        let message = result.error.unwrap();
        assert!(message.starts_with("missing column"), "{message}");
        let failures = observer.failures.lock().unwrap();
        assert!(matches!(failures.as_slice(), [ProcessingError::Internal { .. }]), "{failures:?}");
    }
}
