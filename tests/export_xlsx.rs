#![cfg(feature = "excel")]

mod common;

use calamine::{Data, Reader, open_workbook_auto};
use placeholder_people::export::xlsx::write_xlsx_to_path;
use placeholder_people::export::{ExportOptions, export_to_path};
use placeholder_people::{DEFAULT_FIELDS, GeoLocation, People, PeopleError};
use serde_json::json;

use common::{USERS_FIXTURE, tmp_file};

fn read_rows(path: &std::path::Path) -> Vec<Vec<Data>> {
    let mut wb = open_workbook_auto(path).unwrap();
    let sheets = wb.sheet_names().to_vec();
    assert_eq!(sheets.len(), 1);
    let range = wb.worksheet_range(&sheets[0]).unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}

fn s(v: &str) -> Data {
    Data::String(v.to_string())
}

#[test]
fn header_matches_first_record_and_rows_follow_input_order() {
    let people = People::from_values(vec![
        json!({
            "name": "Leanne Graham",
            "username": "Bret",
            "company": {"name": "Romaguera-Crona"}
        }),
        json!({
            "name": "Ervin Howell",
            "username": "Antonette",
            "company": {"name": "Deckow-Crist"}
        }),
    ])
    .unwrap();
    let projection = people.filter(&["username", "company.email"]).unwrap();

    let path = tmp_file("two-records", "xlsx");
    write_xlsx_to_path(&path, &projection).unwrap();

    let rows = read_rows(&path);
    assert_eq!(
        rows,
        vec![
            vec![s("username"), s("company.email")],
            vec![s("Bret"), s("leanne.graham@romaguera-crona.com")],
            vec![s("Antonette"), s("ervin.howell@deckow-crist.com")],
        ]
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn scalar_cells_keep_their_type() {
    let people = People::from_values(vec![json!({
        "id": 7,
        "active": true,
        "note": null,
        "name": "Kurtis Weissnat",
        "company": {"name": "Johns Group"}
    })])
    .unwrap();
    let projection = people.filter(&["id", "active", "note", "company"]).unwrap();

    let path = tmp_file("typed", "xlsx");
    write_xlsx_to_path(&path, &projection).unwrap();

    let rows = read_rows(&path);
    assert_eq!(rows[1][0], Data::Float(7.0));
    assert_eq!(rows[1][1], Data::Bool(true));
    assert_eq!(rows[1][2], Data::Empty);
    assert_eq!(
        rows[1][3],
        s(r#"{"name":"Johns Group","email":"kurtis.weissnat@johns-group.com"}"#)
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn default_fields_export_through_unified_entrypoint() {
    let mut people = People::from_json_path(USERS_FIXTURE).unwrap();
    people
        .update_location(|_, _| Ok(GeoLocation::new("Nowhere", "UTC")))
        .unwrap();
    let projection = people.filter(&DEFAULT_FIELDS).unwrap();

    let path = tmp_file("unified", "xlsx");
    export_to_path(&projection, &path, &ExportOptions::default()).unwrap();

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], DEFAULT_FIELDS.iter().map(|f| s(f)).collect::<Vec<_>>());
    assert_eq!(rows[3][0], s("Mrs. Dennis Schulist"));
    assert_eq!(rows[3][2], s("Nowhere"));
    assert_eq!(rows[3][6], s("dennis.schulist@keebler.com"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn ragged_projection_fails_without_writing() {
    let people = People::from_values(vec![
        json!({"name": "Ann Lee", "username": "ann", "company": {"name": "Acme"}}),
        json!({"name": "Bo Lee", "company": {"name": "Acme"}}),
    ])
    .unwrap();
    let mut projection = people.filter::<&str>(&[]).unwrap();
    // Same keys as the first record apart from `username`.
    projection[1].remove("username");

    let path = tmp_file("ragged", "xlsx");
    let err = write_xlsx_to_path(&path, &projection).unwrap_err();
    assert!(matches!(err, PeopleError::KeyNotFound { ref path, .. } if path == "username"));
    assert!(!path.exists());
}

#[test]
fn empty_projection_writes_an_empty_sheet() {
    let path = tmp_file("empty", "xlsx");
    write_xlsx_to_path(&path, &[]).unwrap();
    assert!(read_rows(&path).is_empty());
    let _ = std::fs::remove_file(&path);
}
