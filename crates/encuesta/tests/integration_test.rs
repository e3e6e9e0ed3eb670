//! Integration tests for Encuesta.

use std::fs;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use serde_json::json;
use tempfile::TempDir;

use encuesta::source::write_records;
use encuesta::{
    CsvWriter, DatasetKind, EncuestaError, ExportTarget, FileSource, FormStructure, Record,
    Session, XlsxWriter, codify_records, export_rows, normalize, read_submissions, record_card,
    translate_records,
};

/// Helper to write a JSON resource into a data directory.
fn write_resource(dir: &Path, name: &str, value: serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(&value).unwrap())
        .expect("Failed to write resource");
}

/// Data directory with all four datasets.
fn full_data_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_resource(
        dir.path(),
        "kobo_data_export.json",
        json!([
            {"Código de participante": "P001", "Zona": "Norte", "Edad": 34, "¿Tiene hijos?": "Sí", "_uuid": "abc"},
            {"Código de participante": "P002", "Zona": null, "Edad": 41, "¿Tiene hijos?": "No"},
            {"Código de participante": "P003", "Zona": "Sur", "Edad": 29},
        ]),
    );
    write_resource(
        dir.path(),
        "kobo_data_export_coded.json",
        json!([
            {"Código de participante": "P001", "Zona": "Norte", "Edad": 34, "¿Tiene hijos?": 1},
        ]),
    );
    write_resource(
        dir.path(),
        "libro_codigos.json",
        json!({
            "tiene_hijos": {"label": "¿Tiene hijos?", "categories": {"1": "Sí", "2": "No"}},
            "fuma": {"label": "¿Actualmente usted fuma cigarrillos?", "categories": {"1": "Sí", "2": "No"}},
        }),
    );
    write_resource(
        dir.path(),
        "encuestas_fc.json",
        json!([
            {"Paciente": "FC-01", "Presión": "120/80", "Glicemia": 98.5},
            {"PARTICIPANTE": "FC-02", "Presión": "130/85"},
        ]),
    );
    dir
}

fn sheet_rows(path: &Path, sheet: &str) -> Vec<Vec<Data>> {
    let mut book = open_workbook_auto(path).expect("Failed to open workbook");
    let range = book.worksheet_range(sheet).expect("Missing sheet");
    range.rows().map(|r| r.to_vec()).collect()
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_all_datasets() {
    let dir = full_data_dir();
    let mut session = Session::new();
    let report = session.load_all(&FileSource::new(dir.path()));

    assert!(report.is_complete());
    assert_eq!(report.loaded.len(), 4);
    assert_eq!(session.row_count(DatasetKind::Original), 3);
    assert_eq!(session.row_count(DatasetKind::Coded), 1);
    assert_eq!(session.row_count(DatasetKind::Codebook), 2);
    assert_eq!(session.row_count(DatasetKind::Fc), 2);
}

#[test]
fn test_failed_dataset_degrades_to_empty() {
    let dir = full_data_dir();
    fs::remove_file(dir.path().join("kobo_data_export_coded.json")).unwrap();
    fs::write(dir.path().join("encuestas_fc.json"), "{ not json").unwrap();

    let mut session = Session::new();
    let report = session.load_all(&FileSource::new(dir.path()));

    let failed: Vec<_> = report.failed.iter().map(|(k, _)| *k).collect();
    assert_eq!(failed, vec![DatasetKind::Coded, DatasetKind::Fc]);
    assert_eq!(session.row_count(DatasetKind::Coded), 0);
    assert_eq!(session.row_count(DatasetKind::Fc), 0);
    assert_eq!(session.row_count(DatasetKind::Original), 3);
    assert_eq!(session.row_count(DatasetKind::Codebook), 2);
}

#[test]
fn test_reload_replaces_previous_data() {
    let dir = full_data_dir();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    fs::remove_file(dir.path().join("kobo_data_export.json")).unwrap();
    session.load(&FileSource::new(dir.path()), &[DatasetKind::Original]);
    assert_eq!(session.row_count(DatasetKind::Original), 0);
}

#[test]
fn test_status_reports_sources() {
    let dir = full_data_dir();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    let status = session.status();
    assert_eq!(status.len(), 4);
    let codebook = status
        .iter()
        .find(|s| s.dataset == DatasetKind::Codebook)
        .unwrap();
    assert_eq!(
        codebook.source.as_ref().map(|m| m.resource.as_str()),
        Some("libro_codigos.json")
    );
}

// =============================================================================
// Cards and filtering
// =============================================================================

#[test]
fn test_end_to_end_card() {
    let record: Record = serde_json::from_value(json!({
        "Código de participante": "P001",
        "Edad": 34,
        "Zona": null,
    }))
    .unwrap();

    let card = record_card(&record);
    assert_eq!(card.title, "Código: P001");
    assert!(card.has_line("Zona: N/A"));
    assert!(card.has_line("Edad: 34"));
}

#[test]
fn test_fc_cards_use_alias_identifiers() {
    let dir = full_data_dir();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    let titles: Vec<_> = session
        .cards(DatasetKind::Fc, "")
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, vec!["Código: FC-01", "Código: FC-02"]);
}

#[test]
fn test_filter_is_case_insensitive_and_ordered() {
    let dir = full_data_dir();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    let cards = session.cards(DatasetKind::Original, "P00");
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[2].title, "Código: P003");

    let cards = session.cards(DatasetKind::Original, "NORTE");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "Código: P001");
}

#[test]
fn test_codebook_cards_filter_by_response() {
    let dir = full_data_dir();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    assert_eq!(session.cards(DatasetKind::Codebook, "sí").len(), 2);
    let cards = session.cards(DatasetKind::Codebook, "cigarrillos");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "fuma");
    assert_eq!(cards[0].lines, vec!["1: Sí", "2: No"]);
}

#[test]
fn test_normalize_every_alias() {
    for alias in encuesta::IDENTIFIER_ALIASES {
        let record: Record = serde_json::from_value(json!({ alias: "X-9", "Peso": 60 })).unwrap();
        let n = normalize(&record);
        assert_eq!(n.identifier, "X-9");
        assert_eq!(n.fields.len(), 1);
    }
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_export_single_dataset_canonical_columns() {
    let dir = full_data_dir();
    let out = tempfile::tempdir().unwrap();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    let path = session
        .export(
            ExportTarget::Dataset(DatasetKind::Original),
            &XlsxWriter::new(),
            out.path(),
        )
        .expect("Export failed")
        .remove(0);
    assert_eq!(path, out.path().join("kobo_data_export.xlsx"));

    let rows = sheet_rows(&path, "Encuestas Originales");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].len(), encuesta::export::SOCIOECONOMIC_COLUMNS.len());
    assert_eq!(rows[0][0], Data::String("Código de participante".to_string()));
    assert_eq!(rows[0][2], Data::String("Zona".to_string()));
    assert_eq!(rows[1][0], Data::String("P001".to_string()));
    assert_eq!(rows[1][2], Data::String("Norte".to_string()));
    // "_uuid" is not a canonical column
    assert!(!rows[0].contains(&Data::String("_uuid".to_string())));
    // null and missing both export as empty cells
    assert_eq!(rows[2][2], Data::Empty);
    assert_eq!(rows[1][1], Data::Empty);
}

#[test]
fn test_export_all_has_one_sheet_per_dataset() {
    let dir = full_data_dir();
    let out = tempfile::tempdir().unwrap();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    let path = session
        .export(ExportTarget::All, &XlsxWriter::new(), out.path())
        .expect("Export failed")
        .remove(0);
    assert!(path.ends_with("encuestas_completas.xlsx"));

    let book = open_workbook_auto(&path).unwrap();
    assert_eq!(
        book.sheet_names(),
        vec![
            "Encuestas Originales",
            "Encuestas Codificadas",
            "Libro de Códigos",
            "Encuestas FC",
        ]
    );

    let codebook = sheet_rows(&path, "Libro de Códigos");
    assert_eq!(codebook.len(), 1 + export_rows(session.codebook()).len());
    assert_eq!(codebook[0][1], Data::String("Pregunta".to_string()));

    let fc = sheet_rows(&path, "Encuestas FC");
    assert_eq!(fc[0][0], Data::String("Paciente".to_string()));
    assert_eq!(fc[0][3], Data::String("PARTICIPANTE".to_string()));
}

#[test]
fn test_export_all_skips_empty_datasets() {
    let dir = full_data_dir();
    fs::remove_file(dir.path().join("kobo_data_export_coded.json")).unwrap();
    let out = tempfile::tempdir().unwrap();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    let path = session
        .export(ExportTarget::All, &XlsxWriter::new(), out.path())
        .unwrap()
        .remove(0);
    let book = open_workbook_auto(&path).unwrap();
    assert_eq!(book.sheet_names().len(), 3);
    assert!(!book.sheet_names().contains(&"Encuestas Codificadas".to_string()));
}

#[test]
fn test_export_empty_dataset_is_refused() {
    let dir = full_data_dir();
    fs::remove_file(dir.path().join("encuestas_fc.json")).unwrap();
    let out = tempfile::tempdir().unwrap();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    let err = session
        .export(ExportTarget::Dataset(DatasetKind::Fc), &XlsxWriter::new(), out.path())
        .unwrap_err();
    assert!(matches!(err, EncuestaError::EmptyExport(_)));
    assert!(!out.path().join("encuestas_fc.xlsx").exists());
}

#[test]
fn test_export_csv() {
    let dir = full_data_dir();
    let out = tempfile::tempdir().unwrap();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    let paths = session
        .export(ExportTarget::Dataset(DatasetKind::Fc), &CsvWriter::new(), out.path())
        .unwrap();
    let sheet = CsvWriter::sheet_path(&out.path().join("encuestas_fc.csv"), DatasetKind::Fc.sheet_name());
    assert_eq!(paths, vec![sheet.clone()]);
    let content = fs::read_to_string(sheet).unwrap();
    assert!(content.starts_with("Paciente,Presión,Glicemia,PARTICIPANTE\n"));
}

#[test]
fn test_export_all_csv_returns_every_sheet_file() {
    let dir = full_data_dir();
    let out = tempfile::tempdir().unwrap();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    let paths = session
        .export(ExportTarget::All, &CsvWriter::new(), out.path())
        .unwrap();
    assert_eq!(paths.len(), 4);
    assert!(paths.iter().all(|p| p.exists()));
    assert!(paths[2].ends_with("encuestas_completas-Libro_de_Códigos.csv"));
    assert!(!out.path().join("encuestas_completas.csv").exists());
}

// =============================================================================
// Codify
// =============================================================================

#[test]
fn test_codify_matches_coded_dataset() {
    let dir = full_data_dir();
    let mut session = Session::new();
    session.load_all(&FileSource::new(dir.path()));

    let (coded, report) = codify_records(session.records(DatasetKind::Original), session.codebook());
    assert_eq!(report.coded, 2);
    assert_eq!(coded[0].get("¿Tiene hijos?"), Some(&json!(1)));
    assert_eq!(coded[1].get("¿Tiene hijos?"), Some(&json!(2)));
    assert_eq!(coded[0].get("Zona"), Some(&json!("Norte")));
}

#[test]
fn test_codebook_with_null_label_still_loads() {
    let dir = full_data_dir();
    write_resource(
        dir.path(),
        "libro_codigos.json",
        json!({
            "sin_label": {"label": null, "categories": {"1": "Sí"}},
            "edad": {"label": "Edad", "categories": {"1": 18}},
        }),
    );

    let mut session = Session::new();
    let report = session.load_all(&FileSource::new(dir.path()));
    assert!(report.is_complete());
    assert_eq!(session.row_count(DatasetKind::Codebook), 2);

    let rows = export_rows(session.codebook());
    assert_eq!(rows[0].question, "");
    assert_eq!(rows[1].response, "18");
}

// =============================================================================
// Translate
// =============================================================================

#[test]
fn test_translate_then_codify() {
    let dir = tempfile::tempdir().unwrap();
    write_resource(
        dir.path(),
        "asset.json",
        json!({"content": {
            "survey": [
                {"type": "text", "name": "codigo", "label": ["Código de participante"]},
                {"type": "begin_group", "name": "hogar", "label": ["Hogar"], "children": [
                    {"type": "select_one", "name": "hijos", "label": ["¿Tiene hijos?"]}
                ]}
            ],
            "choices": [{"list_name": "si_no", "choices": [
                {"name": "si", "label": ["Sí"]},
                {"name": "no", "label": ["No"]}
            ]}]
        }}),
    );
    write_resource(
        dir.path(),
        "data.json",
        json!({"results": [
            {"_id": 1, "codigo": "P001", "hogar/hijos": "si"},
            {"_id": 2, "codigo": "P002", "hogar/hijos": "no"}
        ]}),
    );

    let form = FormStructure::load(dir.path().join("asset.json")).unwrap();
    let raw = read_submissions(dir.path().join("data.json")).unwrap();
    let labeled = translate_records(&raw, &form);
    write_records(dir.path().join("kobo_data_export.json"), &labeled).unwrap();

    let mut session = Session::new();
    session.load(&FileSource::new(dir.path()), &[DatasetKind::Original]);
    let cards = session.cards(DatasetKind::Original, "");
    assert_eq!(cards[0].title, "Código: P001");
    assert_eq!(cards[0].lines, vec!["¿Tiene hijos?: Sí"]);

    let codebook = serde_json::from_value(json!({
        "tiene_hijos": {"label": "¿Tiene hijos?", "categories": {"1": "Sí", "2": "No"}}
    }))
    .unwrap();
    let (coded, _) = codify_records(session.records(DatasetKind::Original), &codebook);
    assert_eq!(coded[1].get("¿Tiene hijos?"), Some(&json!(2)));
}
