//! Integration tests for loading catalogs from disk.

use std::io::Write;
use std::path::PathBuf;

use cinematch_core::{load_catalog_file, DataLoadError};
use tempfile::NamedTempFile;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("catalog.csv")
}

#[test]
fn test_load_fixture_catalog() {
    let catalog = load_catalog_file(&fixture_path()).expect("fixture should load");

    assert_eq!(catalog.len(), 11);
    let heat = catalog.get(catalog.position_of("heat").unwrap()).unwrap();
    assert_eq!(heat.director, "Michael Mann");
    assert_eq!(heat.genre, "Action, Crime, Drama");
    assert_eq!(heat.stars[1], "Robert De Niro");
    assert_eq!(heat.gross, "67,436,818");
}

#[test]
fn test_fixture_missing_values_normalize_to_empty() {
    let catalog = load_catalog_file(&fixture_path()).unwrap();
    let drishyam = catalog.get(catalog.position_of("Drishyam").unwrap()).unwrap();
    assert_eq!(drishyam.gross, "");
    assert!(drishyam.composite_document().starts_with("Crime, Drama, Thriller Jeethu Joseph"));
}

#[test]
fn test_fixture_duplicate_title_first_occurrence_wins() {
    let catalog = load_catalog_file(&fixture_path()).unwrap();
    assert_eq!(catalog.duplicate_titles(), vec!["Drishyam"]);
    let first = catalog.get(catalog.position_of("DRISHYAM").unwrap()).unwrap();
    assert_eq!(first.released_year, "2013");
}

#[test]
fn test_missing_columns_on_disk() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Series_Title,Genre,Overview").unwrap();
    writeln!(file, "Heat,Crime,Thieves").unwrap();

    let err = load_catalog_file(file.path()).unwrap_err();
    match err {
        DataLoadError::MissingColumns(cols) => {
            assert_eq!(cols, vec!["Director", "Star1", "Star2", "Star3", "Star4"]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn test_empty_file_reports_missing_columns() {
    let file = NamedTempFile::new().unwrap();
    let err = load_catalog_file(file.path()).unwrap_err();
    assert!(matches!(err, DataLoadError::MissingColumns(_)));
}
