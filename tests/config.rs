#![cfg(feature = "rusqlite")]

use common::rusqlite::setup_db;
use common::{GEORGE_ID, Users, ids, request_sample};
use datatables::core::{CONFIG_FILE, Config};
use datatables::error::ConfigError;
use datatables::prelude::*;
use datatables::sqlite::SqliteStorage;
use serde_json::json;

mod common;

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(CONFIG_FILE);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn file_config_drives_column_search() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
        [filters]
        date_format = "%Y/%m/%d"
        date_delimiter = ".."
        null_delimiter = "<none>"
        date_columns = ["founded_at"]
        "#,
    );
    let config = Config::load_from(&path).unwrap();
    let conn = setup_db();

    let mut request = request_sample();
    request["columns"][3]["search"]["value"] = json!("1981/04/23..1981/04/23");
    let request = RequestSpec::from_value(request).unwrap();
    let envelope = respond(&Users::new(), SqliteStorage::new(&conn), &request, &config.filters).unwrap();
    assert_eq!(ids(&envelope), vec![GEORGE_ID]);

    let mut request = request_sample();
    request["columns"][5]["search"]["value"] = json!("<none>");
    let request = RequestSpec::from_value(request).unwrap();
    let envelope = respond(&Users::new(), SqliteStorage::new(&conn), &request, &config.filters).unwrap();
    assert_eq!(envelope.records_filtered, 49);
}

#[test]
fn default_markers_are_plain_text_under_a_custom_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[filters]\nnull_delimiter = \"<none>\"\n");
    let config = Config::load_from(&path).unwrap();
    let conn = setup_db();

    let mut request = request_sample();
    request["columns"][7]["search"]["value"] = json!("-nullDelimiter-");
    let request = RequestSpec::from_value(request).unwrap();
    let envelope = respond(&Users::new(), SqliteStorage::new(&conn), &request, &config.filters).unwrap();
    assert_eq!(envelope.records_filtered, 0);
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}
