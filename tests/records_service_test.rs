//! Tests for RecordService: file formats, strict validation, filesystem seam.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use treesel::application::services::{RecordFormat, RecordService};
use treesel::application::ApplicationError;
use treesel::domain::{DomainError, Record};
use treesel::infrastructure::traits::{MemoryFileSystem, RealFileSystem};

const ORG_TOML: &str = r#"
[[record]]
id = "eng"
label = "Engineering"
icon = "🛠"

[[record]]
id = "alice"
parent = "eng"
label = "Alice"

[[record]]
id = "ghost"
parent = "nowhere"
label = "Ghost"
"#;

const ORG_JSON: &str = r#"[
  {"id": "eng", "label": "Engineering"},
  {"id": "alice", "parent": "eng", "label": "Alice"},
  {"id": "bob", "parent": "eng"}
]"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write records file");
    path
}

#[test]
fn given_toml_file_when_loaded_then_records_in_file_order() {
    let temp = TempDir::new().unwrap();
    let path = write_file(&temp, "org.toml", ORG_TOML);
    let service = RecordService::new(Arc::new(RealFileSystem));

    let records = service.load(&path).unwrap();

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["eng", "alice", "ghost"]);
    assert_eq!(records[0].icon.as_deref(), Some("🛠"));
    assert_eq!(records[1].parent.as_deref(), Some("eng"));
}

#[test]
fn given_json_file_when_loaded_then_missing_label_falls_back_to_id() {
    let service = RecordService::new(Arc::new(MemoryFileSystem::new().with_file("org.json", ORG_JSON)));

    let records = service.load(Path::new("org.json")).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[2].display_label(), "bob");
}

#[test]
fn given_orphan_when_loading_forest_leniently_then_dropped() {
    let service = RecordService::new(Arc::new(MemoryFileSystem::new().with_file("org.toml", ORG_TOML)));

    let forest = service.load_forest(Path::new("org.toml"), false).unwrap();

    let ids: Vec<String> = forest.iter().map(|(_, n)| n.data.id.clone()).collect();
    assert_eq!(ids, vec!["eng", "alice"]);
}

#[test]
fn given_orphan_when_loading_forest_strictly_then_domain_error() {
    let service = RecordService::new(Arc::new(MemoryFileSystem::new().with_file("org.toml", ORG_TOML)));

    let err = service.load_forest(Path::new("org.toml"), true).unwrap_err();

    assert!(
        matches!(
            &err,
            ApplicationError::Domain(DomainError::OrphanRecords(ids)) if ids == &vec!["ghost".to_string()]
        ),
        "got {err:?}"
    );
}

#[test]
fn given_duplicate_ids_when_loading_strictly_then_duplicates_reported_first() {
    let content = r#"[
      {"id": "a"},
      {"id": "a"},
      {"id": "b", "parent": "zzz"}
    ]"#;
    let service = RecordService::new(Arc::new(MemoryFileSystem::new().with_file("dup.json", content)));

    let err = service.load_forest(Path::new("dup.json"), true).unwrap_err();

    assert_eq!(err.to_string(), "duplicate ids: a");
}

#[test]
fn given_unknown_extension_when_loaded_then_unsupported_format() {
    let service = RecordService::new(Arc::new(MemoryFileSystem::new().with_file("org.csv", "id,parent")));

    let err = service.load(Path::new("org.csv")).unwrap_err();

    assert!(matches!(err, ApplicationError::UnsupportedFormat(_)), "got {err:?}");
}

#[test]
fn given_missing_file_when_loaded_then_operation_failed_with_path() {
    let service = RecordService::new(Arc::new(MemoryFileSystem::new()));

    let err = service.load(Path::new("missing.toml")).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }), "got {err:?}");
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn given_malformed_content_when_loaded_then_parse_error() {
    let service = RecordService::new(Arc::new(MemoryFileSystem::new().with_file("bad.json", "{ nope")));

    let err = service.load(Path::new("bad.json")).unwrap_err();

    assert!(matches!(err, ApplicationError::Parse { .. }), "got {err:?}");
}

#[test]
fn given_extension_case_when_detecting_format_then_case_insensitive() {
    assert_eq!(RecordFormat::from_path(Path::new("a.TOML")), Some(RecordFormat::Toml));
    assert_eq!(RecordFormat::from_path(Path::new("a.json")), Some(RecordFormat::Json));
    assert_eq!(RecordFormat::from_path(Path::new("a")), None);
}

#[test]
fn given_record_when_serialized_then_parses_back_as_json() {
    let record = Record::new("x", Some("y"), "Ex").with_icon("*");

    let text = serde_json::to_string(&[&record]).unwrap();
    let parsed = RecordService::parse(&text, RecordFormat::Json).unwrap();

    assert_eq!(parsed, vec![record]);
}
