use chrono::NaiveDate;

use locator_sheet_processing::ingestion::json::{ingest_json_from_path, ingest_json_from_str};
use locator_sheet_processing::ingestion::{process_path, IngestionFormat, IngestionOptions};
use locator_sheet_processing::processing::ProcessOptions;
use locator_sheet_processing::types::Cell;
use locator_sheet_processing::IngestionError;

#[test]
fn ingest_json_from_path_happy_path() {
    let grid = ingest_json_from_path("tests/fixtures/relatorio.json").unwrap();
    assert_eq!(grid.len(), 5);
    assert_eq!(grid[3][1], Cell::Blank);
    assert_eq!(grid[3][4], Cell::Number(45_000.0));
}

#[test]
fn json_report_processes_end_to_end() {
    let result = process_path(
        "tests/fixtures/relatorio.json",
        &IngestionOptions::default(),
        &ProcessOptions::default(),
    )
    .unwrap();
    assert!(result.is_ok(), "{:?}", result.error);
    assert_eq!(result.row_count(), 3);

    let loc = result.column_index("Localizadores").unwrap();
    let gab = result.column_index("Localizadores do Gabinete").unwrap();
    let dig = result.column_index("Dígito").unwrap();
    let inc = result.column_index("Inclusão no Localizador").unwrap();
    let last = result.column_index("Último Evento").unwrap();
    let classe = result.column_index("Classe").unwrap();

    assert_eq!(result.data[0][loc], Cell::text("GABINETE (G) - Minutas <urgente>"));
    assert_eq!(result.data[0][gab], Cell::Number(1.0));
    assert_eq!(result.data[0][dig], Cell::text("4"));

    // Short process number, null class, mixed-case separator, text and numeric "dates".
    assert_eq!(result.data[1][dig], Cell::text(""));
    assert_eq!(result.data[1][classe], Cell::text(""));
    assert_eq!(result.data[1][loc], Cell::text("Loc B - Normal"));
    assert_eq!(result.data[1][gab], Cell::Number(0.0));
    assert_eq!(result.data[1][inc], Cell::text("data inválida"));
    assert_eq!(result.data[1][last], Cell::Number(45_000.0));

    assert_eq!(result.data[2][loc], Cell::text("PRAZO\nDECURSO (G)"));
    assert_eq!(result.data[2][inc], Cell::text(""));
    let last_event = NaiveDate::from_ymd_opt(2024, 1, 31).and_then(|d| d.and_hms_opt(0, 0, 0)).unwrap();
    assert_eq!(result.data[2][last], Cell::DateTime(last_event));
}

#[test]
fn malformed_rows_are_reported_with_their_index() {
    let err = ingest_json_from_str(r#"[["banner"], ["Número Processo"], {"processo": "123"}]"#).unwrap_err();
    assert!(matches!(err, IngestionError::MalformedRow { row: 2, .. }), "{err}");
}

#[test]
fn invalid_json_is_a_json_error() {
    let err = ingest_json_from_str("[[\"banner\"],").unwrap_err();
    assert!(matches!(err, IngestionError::Json(_)));
}

#[test]
fn forced_format_ignores_the_extension() {
    let opts = IngestionOptions {
        format: Some(IngestionFormat::Json),
        ..Default::default()
    };
    let err = process_path("tests/fixtures/relatorio.csv", &opts, &ProcessOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::Json(_)));
}
