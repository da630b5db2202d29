//! Parallel execution of the row-processing pipeline.
//!
//! This module sits "above" [`crate::processing`] and provides:
//!
//! - Chunked parallel row transformation on a dedicated rayon pool
//! - Resource limits / throttling (in-flight chunks)
//! - Real-time metrics + observer hooks for monitoring
//!
//! Rows are transformed independently. Each chunk counts its own `(G)` markers and the run's
//! total is summed from those counts, so concurrent runs on one engine never share state;
//! [`ExecutionMetrics`] only mirror the latest run for monitoring. Output rows keep the input
//! order exactly; the result is identical to [`crate::processing::process_rows`].

mod observer;
mod semaphore;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::error::ProcessingError;
use crate::processing::{catch_internal, plan_rows, ProcessObserver, ProcessStats, RowPlan};
use crate::types::{Cell, ProcessResult};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, StdErrExecutionObserver,
};

use semaphore::Semaphore;

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Number of rows per chunk.
    pub chunk_size: usize,
    /// Upper bound on concurrently executing chunks.
    ///
    /// This is an additional throttle on top of `num_threads`.
    pub max_in_flight_chunks: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            num_threads: Some(n),
            chunk_size: 4_096,
            max_in_flight_chunks: n.max(1),
        }
    }
}

/// A configurable parallel engine for [`crate::processing::process_rows`].
///
/// ```rust
/// use locator_sheet_processing::execution::{ExecutionEngine, ExecutionOptions};
/// use locator_sheet_processing::processing::process_rows;
/// use locator_sheet_processing::types::grid_from_strs;
///
/// let grid = grid_from_strs([
///     vec!["tech"],
///     vec!["Número Processo", "Localizadores"],
///     vec!["5001234-56.2023", "A - B (G)"],
///     vec!["5009999-00.2024", "C - d"],
/// ]);
/// let engine = ExecutionEngine::new(ExecutionOptions {
///     num_threads: Some(2),
///     chunk_size: 1,
///     max_in_flight_chunks: 2,
/// })
/// .unwrap();
/// assert_eq!(engine.process_rows(&grid), process_rows(&grid));
/// ```
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    process_observer: Option<Arc<dyn ProcessObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size == 0`, `max_in_flight_chunks == 0`, or `num_threads == Some(0)`.
    pub fn new(opts: ExecutionOptions) -> Result<Self, ThreadPoolBuildError> {
        assert!(opts.chunk_size > 0, "chunk_size must be > 0");
        assert!(
            opts.max_in_flight_chunks > 0,
            "max_in_flight_chunks must be > 0"
        );
        if let Some(n) = opts.num_threads {
            assert!(n > 0, "num_threads must be > 0 when set");
        }

        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("locator-worker-{i}"))
            .build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            process_observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Attach an observer for processing outcomes (unresolved columns, success, failure).
    pub fn with_process_observer(mut self, observer: Arc<dyn ProcessObserver>) -> Self {
        self.process_observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Process `grid` with data rows transformed in parallel chunks.
    pub fn process_rows(&self, grid: &[Vec<Cell>]) -> ProcessResult {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted);

        let result = catch_internal(|| -> Result<ChunkedOutput, ProcessingError> {
            let plan = plan_rows(grid)?;
            if let Some(obs) = &self.process_observer {
                for role in plan.columns.unresolved() {
                    obs.on_unresolved(role);
                }
            }
            Ok(self.pool.install(|| self.transform_chunks(&plan)))
        })
        .and_then(|inner| inner);

        self.metrics.end_run(start.elapsed());
        match result {
            Ok(output) => {
                let stats = ProcessStats {
                    data_rows: output.data.len(),
                    output_columns: output.headers.len(),
                    gabinete_total: output.gabinete_total,
                };
                if let Some(obs) = &self.process_observer {
                    obs.on_success(&stats);
                }
                self.emit(ExecutionEvent::RunFinished {
                    elapsed: start.elapsed(),
                    metrics: self.metrics.snapshot(),
                });
                ProcessResult {
                    headers: output.headers,
                    data: output.data,
                    error: None,
                }
            }
            Err(e) => self.fail(e),
        }
    }

    fn transform_chunks(&self, plan: &RowPlan<'_>) -> ChunkedOutput {
        let sem = Semaphore::new(self.opts.max_in_flight_chunks);
        let ranges = chunk_ranges(plan.rows.len(), self.opts.chunk_size);

        let per_chunk: Vec<(Vec<Vec<Cell>>, usize)> = ranges
            .into_par_iter()
            .map(|range| {
                let (_permit, waited) = sem.acquire();
                if waited > Duration::ZERO {
                    self.metrics.on_throttle_wait(waited);
                    self.emit(ExecutionEvent::ThrottleWaited { duration: waited });
                }

                self.metrics.on_chunk_start();
                self.emit(ExecutionEvent::ChunkStarted {
                    start_row: range.start,
                    row_count: range.len(),
                });

                let mut chunk_markers = 0;
                let mut out = Vec::with_capacity(range.len());
                for row in &plan.rows[range] {
                    let transformed = plan.transform(row);
                    self.metrics.on_row_processed(transformed.gabinete_count);
                    chunk_markers += transformed.gabinete_count;
                    out.push(transformed.cells);
                }

                self.emit(ExecutionEvent::ChunkFinished {
                    output_rows: out.len(),
                    gabinete_count: chunk_markers,
                });
                self.metrics.on_chunk_end();
                (out, chunk_markers)
            })
            .collect();

        let mut data = Vec::with_capacity(plan.rows.len());
        let mut gabinete_total = 0;
        for (rows, markers) in per_chunk {
            data.extend(rows);
            gabinete_total += markers;
        }
        ChunkedOutput {
            headers: plan.headers(),
            data,
            gabinete_total,
        }
    }

    fn fail(&self, error: ProcessingError) -> ProcessResult {
        if let Some(obs) = &self.process_observer {
            obs.on_failure(&error);
        }
        self.emit(ExecutionEvent::RunFailed {
            message: error.to_string(),
        });
        ProcessResult::failure(error)
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

/// Output of one run. The `(G)` total is summed from this run's chunks only, since the shared
/// [`ExecutionMetrics`] are reset by every run on the engine.
struct ChunkedOutput {
    headers: Vec<String>,
    data: Vec<Vec<Cell>>,
    gabinete_total: usize,
}

fn chunk_ranges(row_count: usize, chunk_size: usize) -> Vec<std::ops::Range<usize>> {
    if row_count == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(row_count.div_ceil(chunk_size));
    let mut start = 0usize;
    while start < row_count {
        let end = (start + chunk_size).min(row_count);
        out.push(start..end);
        start = end;
    }
    out
}
