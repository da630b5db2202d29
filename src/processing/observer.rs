use std::fmt;
use std::sync::Arc;

use crate::error::ProcessingError;
use crate::types::ColumnRole;

/// Summary of a successful processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    /// Data rows transformed (header and technical rows excluded).
    pub data_rows: usize,
    /// Columns in the output schema.
    pub output_columns: usize,
    /// Running total of `(G)` markers over all rows.
    pub gabinete_total: usize,
}

/// Observer interface for processing outcomes.
///
/// Implementors can record metrics or logs. All methods have no-op defaults.
pub trait ProcessObserver: Send + Sync {
    /// Called once per role whose header was not found.
    fn on_unresolved(&self, _role: ColumnRole) {}

    /// Called when processing succeeds.
    fn on_success(&self, _stats: &ProcessStats) {}

    /// Called when processing fails.
    fn on_failure(&self, _error: &ProcessingError) {}
}

/// Logs processing events to stderr.
#[derive(Debug, Default)]
pub struct StdErrProcessObserver;

impl ProcessObserver for StdErrProcessObserver {
    fn on_unresolved(&self, role: ColumnRole) {
        eprintln!("[process][warn] column not found role={role:?} needle={:?}", role.needle());
    }

    fn on_success(&self, stats: &ProcessStats) {
        eprintln!(
            "[process][ok] rows={} columns={} gabinete_total={}",
            stats.data_rows, stats.output_columns, stats.gabinete_total
        );
    }

    fn on_failure(&self, error: &ProcessingError) {
        eprintln!("[process][error] err={error}");
    }
}

/// Options for [`super::process_rows_with`].
#[derive(Clone, Default)]
pub struct ProcessOptions {
    /// Optional observer for logging.
    pub observer: Option<Arc<dyn ProcessObserver>>,
}

impl fmt::Debug for ProcessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessOptions")
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}
