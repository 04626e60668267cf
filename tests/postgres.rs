#![cfg(feature = "postgres-sync")]

use common::postgres::{run, run_comments, run_with, setup_db};
use common::{COUNTRY_NAME, EDITOR, Fixture, GEORGE_ID, comments_request, ids, request_sample};
use datatables::error::DatatablesError;
use datatables::postgres::PostgresStorage;
use datatables::prelude::*;
use serde_json::json;

mod common;

const DATE_DELIMITER: &str = "-dateDelimiter-";

#[test]
fn response_length() {
    let Some(mut client) = setup_db("dt_response_length") else {
        return;
    };
    let envelope = run(&mut client, request_sample()).unwrap();

    assert_eq!(envelope.data.len(), 20);
    assert_eq!(envelope.records_total, 50);
    assert_eq!(envelope.records_filtered, 50);
    assert!(envelope.data[0]["userLogins"].as_i64().unwrap() >= 1);
}

#[test]
fn search_matches_integer_columns() {
    let Some(mut client) = setup_db("dt_search_integer") else {
        return;
    };
    let mut request = request_sample();
    request["columns"][0]["search"]["value"] = json!("1");

    // 1, 10..=19, 21, 31, 41
    let envelope = run(&mut client, request).unwrap();
    assert_eq!(envelope.records_filtered, 14);
}

#[test]
fn search_matches_timestamp_columns() {
    let Some(mut client) = setup_db("dt_search_timestamp") else {
        return;
    };
    let mut request = request_sample();
    request["columns"][3]["search"]["value"] = json!("1981");

    let envelope = run(&mut client, request).unwrap();
    assert_eq!(ids(&envelope), vec![GEORGE_ID]);
    assert_eq!(envelope.data[0]["created_at"], "1981-04-23 10:00:00");
}

#[test]
fn search_by_column_date_range() {
    let Some(mut client) = setup_db("dt_search_date_range") else {
        return;
    };
    let mut request = request_sample();
    request["columns"][3]["search"]["value"] = json!(format!("23/04/1981{DATE_DELIMITER}23/04/1981"));

    let envelope = run(&mut client, request).unwrap();
    assert_eq!(ids(&envelope), vec![GEORGE_ID]);
}

#[test]
fn global_search() {
    let Some(mut client) = setup_db("dt_global_search") else {
        return;
    };
    let mut request = request_sample();
    request["search"]["value"] = json!("george yahoo");

    let envelope = run(&mut client, request).unwrap();
    assert_eq!(ids(&envelope), vec![GEORGE_ID]);
    assert_eq!(envelope.records_filtered, 1);
}

#[test]
fn search_by_column_json() {
    let Some(mut client) = setup_db("dt_search_json") else {
        return;
    };
    let mut request = request_sample();
    request["columns"][7]["search"]["value"] = json!("PAPAKI");

    let envelope = run(&mut client, request).unwrap();
    assert_eq!(ids(&envelope), vec![GEORGE_ID]);
}

#[test]
fn relation_date_column_search() {
    let Some(mut client) = setup_db("dt_relation_date") else {
        return;
    };
    for value in ["15/06/1995", "15-06-1995", COUNTRY_NAME] {
        let mut request = request_sample();
        request["columns"][5]["search"]["value"] = json!(value);

        let envelope = run(&mut client, request).unwrap();
        assert_eq!(ids(&envelope), vec![GEORGE_ID], "searching {value}");
    }
}

#[test]
fn relation_date_range_on_every_field() {
    let Some(mut client) = setup_db("dt_relation_range") else {
        return;
    };
    let untagged = FilterConfig::default();

    let mut request = request_sample();
    request["columns"][5]["search"]["value"] = json!(format!("01/01/1990{DATE_DELIMITER}31/12/1999"));
    let envelope = run_with(&mut client, request, &untagged).unwrap();
    assert_eq!(ids(&envelope), vec![GEORGE_ID]);

    let mut request = request_sample();
    request["columns"][5]["search"]["value"] = json!(format!("01/01/2020{DATE_DELIMITER}31/12/2021"));
    let envelope = run_with(&mut client, request, &untagged).unwrap();
    assert!(envelope.data.is_empty());
    assert_eq!(envelope.records_filtered, 0);
}

#[test]
fn sort_by_belongs_to_many_column() {
    let Some(mut client) = setup_db("dt_sort_roles") else {
        return;
    };
    let mut request = request_sample();
    request["order"][0]["column"] = json!(9);
    let envelope = run(&mut client, request).unwrap();
    assert_eq!(ids(&envelope)[0], GEORGE_ID);

    let mut request = request_sample();
    request["order"][0]["column"] = json!(9);
    request["order"][0]["dir"] = json!("desc");
    request["length"] = json!(-1);
    let envelope = run(&mut client, request).unwrap();
    assert_eq!(envelope.data.len(), 50);
    assert_eq!(ids(&envelope).last(), Some(&GEORGE_ID));
}

#[test]
fn search_by_belongs_to_many_column() {
    let Some(mut client) = setup_db("dt_search_roles") else {
        return;
    };
    let mut request = request_sample();
    request["columns"][9]["search"]["value"] = json!("admin");
    let envelope = run(&mut client, request).unwrap();
    assert_eq!(ids(&envelope), vec![GEORGE_ID]);

    let mut request = request_sample();
    request["columns"][9]["search"]["value"] = json!("editor");
    let envelope = run(&mut client, request).unwrap();
    assert_eq!(envelope.records_filtered, Fixture::new().users_with_role(EDITOR));
}

#[test]
fn search_by_morph_to_column() {
    let Some(mut client) = setup_db("dt_search_morph") else {
        return;
    };
    let envelope = run_comments(&mut client, comments_request(COUNTRY_NAME)).unwrap();
    assert_eq!(ids(&envelope), vec![7]);

    let envelope = run_comments(&mut client, comments_request("yahoo")).unwrap();
    assert_eq!(ids(&envelope), vec![6]);
}

struct Missing(Table);

impl Entity for Missing {
    fn table(&self) -> &Table {
        &self.0
    }

    fn project(&self, row: &Row) -> Result<Record> {
        Ok(row.to_record())
    }
}

#[test]
fn storage_errors_carry_the_server_message() {
    let Some(mut client) = setup_db("dt_storage_error") else {
        return;
    };
    let missing = Missing(Table::new("no_such_table").column("id", ColumnType::Integer));
    let request = RequestSpec::from_value(request_sample()).unwrap();

    let err = respond(&missing, PostgresStorage::new(&mut client), &request, &FilterConfig::default()).unwrap_err();
    let message = match err {
        DatatablesError::Storage(message) => message,
        other => panic!("expected a storage error, got {other:?}"),
    };
    assert!(message.contains("does not exist"), "{message}");
    assert!(message.contains("SQLSTATE 42P01"), "{message}");
}
