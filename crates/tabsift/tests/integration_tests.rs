//! Integration tests for the tabsift pipeline.
//!
//! These tests run ingest, profile, quality, clean and export end to end over
//! the files in `tests/fixtures`.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tabsift::types::SuspectedType;
use tabsift::{
    Cell, CleaningAction, CleaningDirective, ColumnKind, ConcernStatus, DataCleaner,
    DataProfiler, DataQualityAnalyzer, ExportFormat, Exporter, HeaderRow, Ingestor, InputFormat,
    IssueKind, MissingValueStrategy, SemanticType, Session, SiftConfig, Table,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load(filename: &str, header: HeaderRow) -> Table {
    Ingestor::ingest_path(
        &fixtures_path().join(filename),
        None,
        header,
        &SiftConfig::default(),
    )
    .expect("Failed to ingest fixture")
}

fn load_auto(filename: &str) -> Table {
    load(filename, HeaderRow::Auto)
}

fn round_trip(table: &Table, format: ExportFormat) -> Table {
    let bytes = Exporter::export(table, format).expect("Failed to export");
    Ingestor::ingest(
        &bytes,
        format.input_format(),
        HeaderRow::Auto,
        &SiftConfig::default(),
    )
    .expect("Failed to re-ingest export")
}

fn directives() -> Vec<CleaningDirective> {
    vec![
        CleaningDirective::new().missing(MissingValueStrategy::Drop),
        CleaningDirective::new()
            .missing(MissingValueStrategy::FillMean)
            .remove_duplicates(true),
        CleaningDirective::new()
            .missing(MissingValueStrategy::FillMedian)
            .remove_constant_columns(true),
        CleaningDirective::new()
            .missing(MissingValueStrategy::FillMode)
            .remove_duplicates(true)
            .remove_constant_columns(true),
        CleaningDirective::new()
            .coerce_numeric(["amount"])
            .missing(MissingValueStrategy::FillMean)
            .remove_constant_columns(true),
    ]
}

// ============================================================================
// Ingest Tests
// ============================================================================

#[test]
fn test_ingest_csv_with_header() {
    let table = load_auto("sales.csv");
    assert_eq!(table.shape(), (6, 5));
    assert_eq!(
        table.column_names(),
        vec!["region", "units", "price", "order_date", "code"]
    );
    assert!(!table.headers_synthesized());
    assert_eq!(table.column("units").unwrap().kind(), ColumnKind::Numeric);
    assert_eq!(table.column("code").unwrap().kind(), ColumnKind::Numeric);
    assert_eq!(table.column("order_date").unwrap().kind(), ColumnKind::Text);
}

#[test]
fn test_ingest_csv_without_header() {
    let table = load_auto("no_header.csv");
    assert_eq!(table.shape(), (3, 3));
    assert!(table.headers_synthesized());
    assert_eq!(table.column_names(), vec!["Column_0", "Column_1", "Column_2"]);
    assert_eq!(table.column("Column_1").unwrap().missing_count(), 1);
}

#[test]
fn test_ingest_csv_with_explicit_header_row() {
    let table = load("preamble.csv", HeaderRow::Row(2));
    assert_eq!(table.column_names(), vec!["id", "name", "score"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column("score").unwrap().missing_count(), 1);
}

#[test]
fn test_ingest_json_records() {
    let table = load_auto("records.json");
    assert_eq!(table.column_names(), vec!["id", "city", "temp", "ok"]);
    assert_eq!(table.row_count(), 4);
    let ok = table.column("ok").unwrap();
    assert_eq!(ok.cells()[0], Cell::text("true"));
    assert_eq!(ok.missing_count(), 2);
}

#[test]
fn test_ingest_rejects_unknown_format() {
    let err = Ingestor::ingest_tagged(
        b"a,b\n1,2\n",
        "parquet",
        HeaderRow::Auto,
        &SiftConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
}

#[test]
fn test_ingest_undecodable_bytes_is_parse_error() {
    let config = SiftConfig::default();
    for (bytes, format) in [
        (&b"{not json"[..], InputFormat::Json),
        (&b"plain text"[..], InputFormat::Xlsx),
        (&b""[..], InputFormat::Xls),
    ] {
        let err = Ingestor::ingest(bytes, format, HeaderRow::Auto, &config).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR", "format {}", format);
    }
}

// ============================================================================
// Profile and Quality Tests
// ============================================================================

#[test]
fn test_profile_shape_and_unique_bound() {
    for fixture in ["sales.csv", "no_header.csv", "records.json", "mixed.csv"] {
        let table = load_auto(fixture);
        let profile = DataProfiler::profile_table(&table, &SiftConfig::default()).unwrap();
        assert_eq!(profile.row_count, table.row_count(), "{}", fixture);
        assert_eq!(profile.column_count, table.column_count(), "{}", fixture);
        let unique: usize = profile.columns.iter().map(|c| c.unique_count).sum();
        assert!(unique <= table.row_count() * table.column_count(), "{}", fixture);
    }
}

#[test]
fn test_profile_semantic_types() {
    let table = load_auto("sales.csv");
    let profile = DataProfiler::profile_table(&table, &SiftConfig::default()).unwrap();
    let types: Vec<SemanticType> = profile.columns.iter().map(|c| c.semantic_type).collect();
    assert_eq!(
        types,
        vec![
            SemanticType::Categorical,
            SemanticType::Numeric,
            SemanticType::Numeric,
            SemanticType::DatetimeCandidate,
            SemanticType::Numeric,
        ]
    );
    assert!(profile.correlations.get("units", "price").is_some());
}

#[test]
fn test_quality_report_on_sales() {
    let table = load_auto("sales.csv");
    let report = DataQualityAnalyzer::analyze(&table, &SiftConfig::default());

    assert_eq!(report.missing_count("units"), 1);
    assert_eq!(report.missing_count("price"), 1);
    assert_eq!(report.missing_count("code"), 1);
    assert_eq!(report.duplicate_rows, 1);
    assert!(report.constant_columns.is_empty());
    assert_eq!(report.type_mismatches.len(), 1);
    assert_eq!(report.type_mismatches[0].column, "order_date");
    assert_eq!(report.type_mismatches[0].suspected_type, SuspectedType::Datetime);
}

#[test]
fn test_missing_count_matches_independent_count() {
    for fixture in ["sales.csv", "no_header.csv", "records.json", "mixed.csv"] {
        let table = load_auto(fixture);
        let report = DataQualityAnalyzer::analyze(&table, &SiftConfig::default());
        let independent = table
            .columns()
            .iter()
            .flat_map(|column| column.cells())
            .filter(|cell| match cell {
                Cell::Missing => true,
                Cell::Text(s) => s.trim().is_empty(),
                Cell::Number(_) => false,
            })
            .count();
        assert_eq!(report.total_missing(), independent, "{}", fixture);
    }
}

#[test]
fn test_quality_mixed_and_threshold() {
    let table = load_auto("mixed.csv");
    let report = DataQualityAnalyzer::analyze(&table, &SiftConfig::default());
    assert_eq!(report.mixed_type_columns, vec!["amount".to_string()]);
    assert_eq!(report.constant_columns, vec!["status".to_string()]);
    assert!(report.type_mismatches.is_empty());
    assert!(report.issues.iter().any(|i| i.issue == IssueKind::MixedTypes));

    let loose = SiftConfig::builder().mismatch_threshold(0.7).build().unwrap();
    let report = DataQualityAnalyzer::analyze(&table, &loose);
    assert_eq!(report.type_mismatches[0].column, "amount");
    assert_eq!(report.type_mismatches[0].suspected_type, SuspectedType::Numeric);
}

// ============================================================================
// Cleaning Tests
// ============================================================================

#[test]
fn test_coerce_mixed_column() {
    let table = load_auto("mixed.csv");
    let directive = CleaningDirective::new().coerce_numeric(["amount"]);
    let (cleaned, report) = DataCleaner::clean(&table, &directive);

    assert_eq!(
        cleaned.column("amount").unwrap().cells(),
        &[
            Cell::Number(1.0),
            Cell::Number(2.0),
            Cell::Missing,
            Cell::Number(4.0)
        ]
    );
    assert!(!report.has_failures());
    let entry = &report.entries[0];
    assert!(matches!(
        entry.status,
        ConcernStatus::Applied(CleaningAction::Coerced { unparseable: 1, .. })
    ));
}

#[test]
fn test_fill_mean_hard_fails_only_text_columns() {
    let table = load_auto("sales.csv");
    let extra = table
        .with_column(tabsift::Column::from_values(
            "region",
            [None, Some("South"), Some("North"), Some("East"), Some("West"), Some("South")],
        ))
        .unwrap();
    let directive = CleaningDirective::new().missing(MissingValueStrategy::FillMean);
    let (cleaned, report) = DataCleaner::clean(&extra, &directive);

    let failed: Vec<&str> = report
        .entries
        .iter()
        .filter(|e| e.status.is_failure())
        .filter_map(|e| e.column.as_deref())
        .collect();
    assert_eq!(failed, vec!["region"]);
    assert_eq!(cleaned.column("units").unwrap().missing_count(), 0);
    assert_eq!(cleaned.column("price").unwrap().missing_count(), 0);
    assert_eq!(cleaned.column("region").unwrap().missing_count(), 1);
}

#[test]
fn test_clean_is_idempotent_over_fixtures() {
    for fixture in ["sales.csv", "no_header.csv", "records.json", "mixed.csv"] {
        let table = load_auto(fixture);
        for directive in directives() {
            let (once, _) = DataCleaner::clean(&table, &directive);
            let (twice, _) = DataCleaner::clean(&once, &directive);
            assert_eq!(twice, once, "{} with {:?}", fixture, directive);
        }
    }
}

#[test]
fn test_remove_duplicates_on_json() {
    let table = load_auto("records.json");
    let (cleaned, report) =
        DataCleaner::clean(&table, &CleaningDirective::new().remove_duplicates(true));
    assert_eq!(cleaned.row_count(), 3);
    assert_eq!(report.rows_before, 4);
    assert_eq!(
        DataQualityAnalyzer::analyze(&cleaned, &SiftConfig::default()).duplicate_rows,
        0
    );
}

// ============================================================================
// Export Round-Trip Tests
// ============================================================================

#[test]
fn test_round_trip_json_and_xlsx_exact() {
    for fixture in ["sales.csv", "records.json", "mixed.csv"] {
        let table = load_auto(fixture);
        for format in [ExportFormat::Json, ExportFormat::Xlsx] {
            let back = round_trip(&table, format);
            assert_eq!(back, table, "{} via {}", fixture, format);
        }
    }
}

#[test]
fn test_round_trip_csv_reinfers_numeric() {
    let table = load_auto("records.json");
    let back = round_trip(&table, ExportFormat::Csv);
    assert_eq!(back.column_names(), table.column_names());
    for name in ["id", "temp"] {
        assert_eq!(back.column(name).unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(back.column(name), table.column(name));
    }
}

#[test]
fn test_round_trip_after_cleaning() {
    let table = load_auto("sales.csv");
    let directive = CleaningDirective::new()
        .missing(MissingValueStrategy::FillMedian)
        .remove_duplicates(true);
    let (cleaned, _) = DataCleaner::clean(&table, &directive);
    assert_eq!(round_trip(&cleaned, ExportFormat::Xlsx), cleaned);
    assert_eq!(round_trip(&cleaned, ExportFormat::Csv), cleaned);
}

#[test]
fn test_export_rejects_unknown_format() {
    let err = Exporter::export_tagged(&load_auto("sales.csv"), "pdf").unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_EXPORT_FORMAT");
}

// ============================================================================
// Session Tests
// ============================================================================

#[test]
fn test_session_end_to_end() {
    let bytes = std::fs::read(fixtures_path().join("no_header.csv")).unwrap();
    let mut session = Session::open(
        &bytes,
        InputFormat::Csv,
        HeaderRow::Auto,
        SiftConfig::default(),
    )
    .unwrap();
    assert!(session.headers_suspect());

    session.apply_headers(&["a", "b", "c"]).unwrap();
    let report = session.clean(&CleaningDirective::new().missing(MissingValueStrategy::FillMean));
    assert!(!report.has_failures());

    let assessment = session.assess().unwrap();
    assert_eq!(assessment.quality.total_missing(), 0);
    assert_eq!(
        assessment.profile.column("b").unwrap().semantic_type,
        SemanticType::Numeric
    );

    let exported = session.export(ExportFormat::Json).unwrap();
    let back = Ingestor::ingest(
        &exported,
        InputFormat::Json,
        HeaderRow::Auto,
        session.config(),
    )
    .unwrap();
    assert_eq!(&back, session.current());
}
