use datatables::core::{FilterConfig, ResultEnvelope};
use datatables::prelude::*;
use datatables::sqlite::SqliteStorage;
use rusqlite::{Connection, params};
use serde_json::Value as Json;

use super::{COUNTRY_FOUNDED_AT, COUNTRY_ID, COUNTRY_NAME, Comments, Fixture, ROLES, Users, filters};

pub fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    create_tables(&conn);
    seed(&conn, &Fixture::new());
    conn
}

fn create_tables(conn: &Connection) {
    conn.execute_batch(
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
            settings TEXT,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        );
        CREATE TABLE user_logins (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users (id),
            logged_at DATETIME NOT NULL
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

pub fn seed(conn: &Connection, fixture: &Fixture) {
    conn.execute(
        "INSERT INTO countries (id, name, founded_at) VALUES (?1, ?2, ?3)",
        params![COUNTRY_ID, COUNTRY_NAME, COUNTRY_FOUNDED_AT],
    )
    .expect("Failed to insert country");

    for (id, title) in ROLES {
        conn.execute("INSERT INTO roles (id, title) VALUES (?1, ?2)", params![id, title])
            .expect("Failed to insert role");
    }

    for user in &fixture.users {
        conn.execute(
            "INSERT INTO users (id, name, email, country_id, settings, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                user.id,
                user.name,
                user.email,
                user.country_id,
                user.settings,
                user.created_at
            ],
        )
        .expect("Failed to insert user");

        for _ in 0..user.logins {
            conn.execute(
                "INSERT INTO user_logins (user_id, logged_at) VALUES (?1, '2024-01-01 00:00:00')",
                [user.id],
            )
            .expect("Failed to insert login");
        }
        for role in &user.roles {
            conn.execute(
                "INSERT INTO role_user (user_id, role_id) VALUES (?1, ?2)",
                params![user.id, role],
            )
            .expect("Failed to attach role");
        }
    }

    for comment in &fixture.comments {
        conn.execute(
            "INSERT INTO comments (id, body, commentable_type, commentable_id) VALUES (?1, ?2, ?3, ?4)",
            params![
                comment.id,
                comment.body,
                comment.commentable_type,
                comment.commentable_id
            ],
        )
        .expect("Failed to insert comment");
    }
}

pub fn run(conn: &Connection, request: Json) -> Result<ResultEnvelope> {
    run_with(conn, request, &filters())
}

pub fn run_with(conn: &Connection, request: Json, filters: &FilterConfig) -> Result<ResultEnvelope> {
    let request = RequestSpec::from_value(request)?;
    respond(&Users::new(), SqliteStorage::new(conn), &request, filters)
}

pub fn run_comments(conn: &Connection, request: Json) -> Result<ResultEnvelope> {
    let request = RequestSpec::from_value(request)?;
    respond(&Comments::new(), SqliteStorage::new(conn), &request, &filters())
}
