use datatables::core::{FilterConfig, ResultEnvelope};
use datatables::postgres::PostgresStorage;
use datatables::prelude::*;
use postgres::{Client, NoTls};
use serde_json::Value as Json;

use super::{COUNTRY_FOUNDED_AT, COUNTRY_ID, COUNTRY_NAME, Comments, Fixture, ROLES, Users, filters};

/// Connects to `DATABASE_URL` and seeds a fresh schema named `schema`.
///
/// Returns `None` when `DATABASE_URL` is not set, so the PostgreSQL tests
/// only run where a server is available.
pub fn setup_db(schema: &str) -> Option<Client> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL is not set; skipping PostgreSQL test");
        return None;
    };

    let mut client = Client::connect(&url, NoTls).expect("connect");
    client
        .batch_execute(&format!(
            "DROP SCHEMA IF EXISTS \"{schema}\" CASCADE; CREATE SCHEMA \"{schema}\"; SET search_path TO \"{schema}\""
        ))
        .expect("setup test schema");
    create_tables(&mut client);
    seed(&mut client, &Fixture::new());
    Some(client)
}

fn create_tables(client: &mut Client) {
    client
        .batch_execute(
            "CREATE TABLE countries (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                founded_at DATE
            );
            CREATE TABLE users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                country_id INTEGER REFERENCES countries (id),
                settings JSONB,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            );
            CREATE TABLE user_logins (
                id SERIAL PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users (id),
                logged_at TIMESTAMP NOT NULL
            );
            CREATE TABLE roles (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL
            );
            CREATE TABLE role_user (
                user_id INTEGER NOT NULL REFERENCES users (id),
                role_id INTEGER NOT NULL REFERENCES roles (id),
                PRIMARY KEY (user_id, role_id)
            );
            CREATE TABLE comments (
                id INTEGER PRIMARY KEY,
                body TEXT NOT NULL,
                commentable_type TEXT NOT NULL,
                commentable_id INTEGER NOT NULL
            );",
        )
        .expect("Failed to create tables");
}

fn seed(client: &mut Client, fixture: &Fixture) {
    client
        .execute(
            "INSERT INTO countries (id, name, founded_at) VALUES ($1, $2, CAST($3::TEXT AS DATE))",
            &[&(COUNTRY_ID as i32), &COUNTRY_NAME, &COUNTRY_FOUNDED_AT],
        )
        .expect("Failed to insert country");

    for (id, title) in ROLES {
        client
            .execute("INSERT INTO roles (id, title) VALUES ($1, $2)", &[&(id as i32), &title])
            .expect("Failed to insert role");
    }

    for user in &fixture.users {
        let id = user.id as i32;
        let country_id = user.country_id.map(|id| id as i32);
        client
            .execute(
                "INSERT INTO users (id, name, email, country_id, settings, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, CAST($5::TEXT AS JSONB), CAST($6::TEXT AS TIMESTAMP), CAST($6::TEXT AS TIMESTAMP))",
                &[&id, &user.name, &user.email, &country_id, &user.settings, &user.created_at],
            )
            .expect("Failed to insert user");

        for _ in 0..user.logins {
            client
                .execute(
                    "INSERT INTO user_logins (user_id, logged_at) VALUES ($1, '2024-01-01 00:00:00')",
                    &[&id],
                )
                .expect("Failed to insert login");
        }
        for role in &user.roles {
            client
                .execute(
                    "INSERT INTO role_user (user_id, role_id) VALUES ($1, $2)",
                    &[&id, &(*role as i32)],
                )
                .expect("Failed to attach role");
        }
    }

    for comment in &fixture.comments {
        client
            .execute(
                "INSERT INTO comments (id, body, commentable_type, commentable_id) VALUES ($1, $2, $3, $4)",
                &[
                    &(comment.id as i32),
                    &comment.body,
                    &comment.commentable_type,
                    &(comment.commentable_id as i32),
                ],
            )
            .expect("Failed to insert comment");
    }
}

pub fn run(client: &mut Client, request: Json) -> Result<ResultEnvelope> {
    run_with(client, request, &filters())
}

pub fn run_with(client: &mut Client, request: Json, filters: &FilterConfig) -> Result<ResultEnvelope> {
    let request = RequestSpec::from_value(request)?;
    respond(&Users::new(), PostgresStorage::new(client), &request, filters)
}

pub fn run_comments(client: &mut Client, request: Json) -> Result<ResultEnvelope> {
    let request = RequestSpec::from_value(request)?;
    respond(&Comments::new(), PostgresStorage::new(client), &request, &filters())
}
