#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;

use locator_sheet_processing::export::{to_xlsx_buffer, write_xlsx, ExportOptions};
use locator_sheet_processing::ingestion::excel::ingest_excel_from_path;
use locator_sheet_processing::ingestion::{process_path, IngestionOptions, SheetSelection};
use locator_sheet_processing::processing::{process_rows, ProcessOptions};
use locator_sheet_processing::types::Cell;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("locator-sheet-{name}-{nanos}.xlsx"))
}

/// A report shaped like the eproc export: banner row, header row, then data.
fn write_report_xlsx(path: &PathBuf, extra_sheet_first: bool) {
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    let mut wb = Workbook::new();
    if extra_sheet_first {
        let notes = wb.add_worksheet();
        notes.set_name("Notas").unwrap();
        notes.write_string(0, 0, "nada aqui").unwrap();
    }

    let ws = wb.add_worksheet();
    ws.set_name("Relatorio").unwrap();
    ws.write_string(0, 0, "Relatório de processos por localizador").unwrap();

    let headers = [
        "Número Processo",
        "Classe",
        "Localizadores",
        "Inclusão no Localizador",
        "Último Evento",
    ];
    for (col, h) in headers.iter().enumerate() {
        ws.write_string(1, col as u16, *h).unwrap();
    }

    ws.write_string(2, 0, " 5001234-56.2023.4.04.7000").unwrap();
    ws.write_string(2, 1, "Procedimento Comum").unwrap();
    ws.write_string(2, 2, "SECRETARIA (Principal) - AGUARDA PRAZO (G)").unwrap();
    ws.write_string(2, 3, "01/02/2024 10:30").unwrap();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let last_event = ExcelDateTime::from_ymd(2024, 2, 15).unwrap();
    ws.write_datetime_with_format(2, 4, &last_event, &date_format).unwrap();

    ws.write_number(3, 0, 5009876.0).unwrap();
    ws.write_string(3, 2, "A (G) - b (G)").unwrap();

    wb.save(path).unwrap();
}

#[test]
fn ingest_excel_reads_banner_headers_and_typed_cells() {
    let path = tmp_file("ingest");
    write_report_xlsx(&path, false);

    let grid = ingest_excel_from_path(&path, None).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(grid.len(), 4);
    assert_eq!(grid[0], vec![Cell::text("Relatório de processos por localizador")]);
    assert_eq!(grid[1].len(), 5);
    assert_eq!(grid[2][0], Cell::text(" 5001234-56.2023.4.04.7000"));
    let expected = NaiveDate::from_ymd_opt(2024, 2, 15).and_then(|d| d.and_hms_opt(0, 0, 0)).unwrap();
    assert_eq!(grid[2][4], Cell::DateTime(expected));
    // Trailing empty cells are not carried over.
    assert_eq!(grid[3], vec![Cell::Number(5009876.0), Cell::Blank, Cell::text("A (G) - b (G)")]);
}

#[test]
fn named_sheet_is_selected() {
    let path = tmp_file("named");
    write_report_xlsx(&path, true);

    let first = ingest_excel_from_path(&path, None).unwrap();
    let opts = IngestionOptions {
        sheet: SheetSelection::Named("Relatorio".to_string()),
        ..Default::default()
    };
    let result = process_path(&path, &opts, &ProcessOptions::default()).unwrap();
    let missing = ingest_excel_from_path(&path, Some("NaoExiste"));
    let _ = std::fs::remove_file(&path);

    assert_eq!(first, vec![vec![Cell::text("nada aqui")]]);
    assert!(result.is_ok(), "{:?}", result.error);
    assert_eq!(result.row_count(), 2);
    assert!(missing.is_err());
}

#[test]
fn processed_report_exports_to_a_formatted_workbook() {
    let input = tmp_file("input");
    let output = tmp_file("output");
    write_report_xlsx(&input, false);

    let grid = ingest_excel_from_path(&input, None).unwrap();
    let result = process_rows(&grid);
    assert!(result.is_ok(), "{:?}", result.error);
    write_xlsx(&result, &output, &ExportOptions::default()).unwrap();

    let mut workbook = open_workbook_auto(&output).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Dados Processados".to_string()]);
    let range = workbook.worksheet_range("Dados Processados").unwrap();
    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);

    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    let header: Vec<String> = rows[0].iter().map(|d| d.to_string()).collect();
    assert_eq!(header, result.headers);
    assert_eq!(rows.len(), 3);

    let loc = result.column_index("Localizadores").unwrap();
    let gab = result.column_index("Localizadores do Gabinete").unwrap();
    let feito = result.column_index("Feito").unwrap();
    let dig = result.column_index("Dígito").unwrap();
    let last = result.column_index("Último Evento").unwrap();

    assert_eq!(rows[1][loc], Data::String("SECRETARIA\nAGUARDA PRAZO (G)".to_string()));
    assert_eq!(rows[1][gab], Data::Float(1.0));
    assert_eq!(rows[1][feito], Data::String("FALSO".to_string()));
    assert_eq!(rows[1][dig], Data::String("4".to_string()));
    assert!(matches!(rows[1][last], Data::DateTime(_)), "{:?}", rows[1][last]);

    assert_eq!(rows[2][gab], Data::Float(2.0));
    assert_eq!(rows[2][dig], Data::String("6".to_string()));
}

#[test]
fn header_only_results_still_export() {
    let grid = vec![
        vec![Cell::text("banner")],
        vec![Cell::text("Número Processo"), Cell::text("Localizadores")],
    ];
    let result = process_rows(&grid);
    let bytes = to_xlsx_buffer(&result, &ExportOptions::default()).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
