use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use locator_sheet_processing::execution::{ExecutionEngine, ExecutionOptions, StdErrExecutionObserver};
use locator_sheet_processing::export::{write_xlsx, ExportOptions};
use locator_sheet_processing::ingestion::{
    ingest_from_path, IngestionObserver, IngestionOptions, SheetSelection, StdErrObserver,
};
use locator_sheet_processing::processing::{
    process_rows_with, ProcessObserver, ProcessOptions, StdErrProcessObserver,
};
use locator_sheet_processing::{IngestionError, ProcessResult};

#[derive(Parser)]
#[command(author, version, about = "Clean an eproc locator report into a formatted workbook")]
struct Args {
    /// Report to process (.xlsx, .xls, .csv or .json).
    input: PathBuf,
    /// Output workbook; defaults to `<input stem>_processado.xlsx` next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Worksheet to read instead of the first one.
    #[arg(long)]
    sheet: Option<String>,
    /// Print the result as JSON on stdout instead of writing a workbook.
    #[arg(long)]
    json: bool,
    /// Process rows on a pool with this many threads.
    #[arg(long)]
    threads: Option<usize>,
    /// Log ingestion and processing events to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Erro ao processar: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let ingestion = IngestionOptions {
        sheet: args
            .sheet
            .clone()
            .map_or(SheetSelection::First, SheetSelection::Named),
        observer: args
            .verbose
            .then(|| Arc::new(StdErrObserver) as Arc<dyn IngestionObserver>),
        ..Default::default()
    };
    let grid = ingest_from_path(&args.input, &ingestion).map_err(|e| e.to_string())?;

    let result = match args.threads {
        Some(threads) => {
            let threads = threads.max(1);
            let mut engine = ExecutionEngine::new(ExecutionOptions {
                num_threads: Some(threads),
                max_in_flight_chunks: threads,
                ..Default::default()
            })
            .map_err(|e| e.to_string())?;
            if args.verbose {
                engine = engine
                    .with_observer(Arc::new(StdErrExecutionObserver))
                    .with_process_observer(Arc::new(StdErrProcessObserver));
            }
            engine.process_rows(&grid)
        }
        None => {
            let options = ProcessOptions {
                observer: args
                    .verbose
                    .then(|| Arc::new(StdErrProcessObserver) as Arc<dyn ProcessObserver>),
            };
            process_rows_with(&grid, &options)
        }
    };

    if let Some(error) = &result.error {
        return Err(error.clone());
    }

    if args.json {
        let json = serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    export(&result, &output).map_err(|e| e.to_string())?;
    eprintln!("{} linhas processadas -> {}", result.row_count(), output.display());
    Ok(())
}

fn export(result: &ProcessResult, output: &Path) -> Result<(), IngestionError> {
    write_xlsx(result, output, &ExportOptions::default())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "relatorio".to_string());
    input.with_file_name(format!("{stem}_processado.xlsx"))
}
