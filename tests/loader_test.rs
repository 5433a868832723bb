//! Row file loading from disk.

use std::fs;
use std::path::Path;

use rstest::rstest;
use tempfile::TempDir;

use treegrid::application::ApplicationError;
use treegrid::domain::{validate, DomainError, OrphanPolicy, TreeIssue, TreeRow};
use treegrid::infrastructure::{load_rows, InfraError, RowFormat};
use treegrid::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[rstest]
fn given_bom_resource_when_loading_then_rows_keep_order_and_fields() {
    let rows = load_rows(Path::new("tests/resources/bom.json")).expect("load bom");

    let ids: Vec<_> = rows.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["P1", "C1", "G1", "G2", "C2", "G3", "P2"]);
    assert_eq!(rows[1].parent_id(), Some("P1"));
    assert_eq!(rows[5].field_display("quantity").as_deref(), Some("32"));
    assert!(validate(&rows, OrphanPolicy::Exclude).is_empty());
}

#[rstest]
fn given_malformed_resource_when_validating_then_reports_every_issue() {
    let rows = load_rows(Path::new("tests/resources/malformed.toml")).expect("load toml");

    let issues = validate(&rows, OrphanPolicy::Exclude);

    assert!(issues.contains(&TreeIssue::DuplicateId {
        id: "P1".into(),
        position: 4
    }));
    assert!(issues.iter().any(|i| matches!(i, TreeIssue::Cycle(_))));
    assert!(issues.iter().any(|i| matches!(i, TreeIssue::Orphan { id, .. } if id == "O1")));
}

#[rstest]
fn given_toml_array_when_loading_then_parses_rows() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("rows.toml");
    fs::write(
        &path,
        "[[rows]]\nid = \"R\"\nname = \"root\"\n\n[[rows]]\nid = \"K\"\nparentId = \"R\"\nlevel = 1\n",
    )
    .expect("write");

    let rows = load_rows(&path).expect("load");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].level(), 0);
    assert_eq!(rows[1].parent_id(), Some("R"));
}

#[rstest]
fn given_empty_list_when_loading_then_empty_input_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("rows.json");
    fs::write(&path, "[]").expect("write");

    let err = load_rows(&path).unwrap_err();

    assert!(matches!(
        err,
        InfraError::Application(ApplicationError::Domain(DomainError::EmptyInput(_)))
    ));
}

#[rstest]
fn given_missing_file_when_loading_then_io_error() {
    let dir = TempDir::new().expect("tempdir");

    let err = load_rows(&dir.path().join("absent.json")).unwrap_err();

    assert!(matches!(err, InfraError::Io { .. }));
}

#[rstest]
fn given_invalid_json_when_loading_then_parse_error_names_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "[{\"id\": ").expect("write");

    let err = load_rows(&path).unwrap_err();

    assert!(matches!(err, InfraError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[rstest]
#[case("rows.JSON", Some(RowFormat::Json))]
#[case("rows.toml", Some(RowFormat::Toml))]
#[case("rows.csv", None)]
#[case("rows", None)]
fn given_extension_when_detecting_format_then_matches(
    #[case] name: &str,
    #[case] expected: Option<RowFormat>,
) {
    assert_eq!(RowFormat::from_path(Path::new(name)).ok(), expected);
}
