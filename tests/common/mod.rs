#![allow(dead_code)]

use datatables::core::{MorphGroup, Pivot, Predicate, ResultEnvelope, SelectQuery, Subquery};
use datatables::error::DatatablesError;
use datatables::prelude::*;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Value as Json, json};

#[cfg(feature = "postgres-sync")]
pub mod postgres;
#[cfg(feature = "rusqlite")]
pub mod rusqlite;

pub const GEORGE_ID: i64 = 50;
pub const GEORGE_EMAIL: &str = "papakitsos_george@yahoo.gr";
pub const COUNTRY_ID: i64 = 1;
pub const COUNTRY_NAME: &str = "Greece";
pub const COUNTRY_FOUNDED_AT: &str = "1995-06-15";

pub const ADMIN: i64 = 1;
pub const EDITOR: i64 = 2;
pub const VIEWER: i64 = 3;
pub const ROLES: [(i64, &str); 3] = [(ADMIN, "admin"), (EDITOR, "editor"), (VIEWER, "viewer")];

const RANDOM_USERS: usize = 49;
const SEED: u64 = 0x5eed;

pub struct UserSeed {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub country_id: Option<i64>,
    pub settings: Option<String>,
    pub created_at: String,
    pub logins: usize,
    pub roles: Vec<i64>,
}

pub struct CommentSeed {
    pub id: i64,
    pub body: String,
    pub commentable_type: &'static str,
    pub commentable_id: i64,
}

/// Rows shared by every backend
pub struct Fixture {
    pub users: Vec<UserSeed>,
    pub comments: Vec<CommentSeed>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::generate(RANDOM_USERS, SEED)
    }

    /// `rows` random users with 1..=5 logins and the viewer role (sometimes editor too),
    /// then George: the only admin, the only user with a country and 10..=20 logins.
    /// Five random users, George and the country carry a comment.
    pub fn generate(rows: usize, rng_seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(rng_seed);

        let first_names = [
            "John", "Alice", "Thomas", "Sarah", "Mike", "Laura", "Ethan", "Maria", "Nikos", "Eleni",
        ];
        let last_names = ["Smith", "Jones", "Brown", "Taylor", "Wilson", "Evans", "Walker", "Wright"];

        let mut users = Vec::with_capacity(rows + 1);
        for i in 0..rows {
            let first = first_names.choose(&mut rng).unwrap();
            let last = last_names.choose(&mut rng).unwrap();
            let settings = rng
                .random_bool(0.5)
                .then(|| json!({ "is_admin": false, "nickname": first.to_lowercase() }).to_string());
            let created_at = format!(
                "{}-{:02}-{:02} {:02}:00:00",
                rng.random_range(2010..=2023),
                rng.random_range(1..=12),
                rng.random_range(1..=28),
                rng.random_range(0..=23),
            );
            let mut roles = vec![VIEWER];
            if rng.random_bool(0.5) {
                roles.push(EDITOR);
            }
            users.push(UserSeed {
                id: i as i64 + 1,
                name: format!("{first} {last}"),
                email: format!("{}.{}{i}@example.com", first.to_lowercase(), last.to_lowercase()),
                country_id: None,
                settings,
                created_at,
                logins: rng.random_range(1..=5),
                roles,
            });
        }

        users.push(UserSeed {
            id: rows as i64 + 1,
            name: "George Papakitsos".to_owned(),
            email: GEORGE_EMAIL.to_owned(),
            country_id: Some(COUNTRY_ID),
            settings: Some(r#"{ "is_admin": true, "nickname": "papaki" }"#.to_owned()),
            created_at: "1981-04-23 10:00:00".to_owned(),
            logins: rng.random_range(10..=20),
            roles: vec![ADMIN],
        });

        let mut comments = Vec::new();
        let owners = users
            .iter()
            .take(5)
            .chain(users.last())
            .map(|user| ("Nice profile", "user", user.id))
            .chain([("Lovely country", "country", COUNTRY_ID)]);
        for (body, commentable_type, commentable_id) in owners {
            comments.push(CommentSeed {
                id: comments.len() as i64 + 1,
                body: body.to_owned(),
                commentable_type,
                commentable_id,
            });
        }

        Self { users, comments }
    }

    pub fn users_with_role(&self, role: i64) -> u64 {
        self.users.iter().filter(|u| u.roles.contains(&role)).count() as u64
    }
}

/// The users table served as a datatable
pub struct Users {
    table: Table,
}

impl Users {
    pub fn new() -> Self {
        Self {
            table: Table::new("users")
                .column("id", ColumnType::Integer)
                .column("name", ColumnType::Text)
                .column("email", ColumnType::Text)
                .column("country_id", ColumnType::Integer)
                .column("settings", ColumnType::Json)
                .column("created_at", ColumnType::DateTime)
                .column("updated_at", ColumnType::DateTime),
        }
    }
}

impl Searchable for Users {
    fn search(&self, term: &str) -> Predicate {
        Predicate::any([
            Predicate::contains(Expr::column("users", "name"), term),
            Predicate::contains(Expr::column("users", "email"), term),
        ])
    }
}

impl Scopable for Users {
    fn scope(&self, name: &str, args: &[Value]) -> Option<Predicate> {
        match name {
            "test" => Some(Predicate::eq(Expr::column("users", "id"), Value::from(1))),
            "byEmail" => Some(Predicate::eq(
                Expr::column("users", "email"),
                args.first().cloned().unwrap_or_default(),
            )),
            _ => None,
        }
    }
}

impl Entity for Users {
    fn table(&self) -> &Table {
        &self.table
    }

    fn relations(&self) -> RelationCatalog {
        RelationCatalog::new()
            .with(
                "country",
                RelationDescriptor::belongs_to("countries", "country_id", "id").fields(["name", "founded_at"]),
            )
            .with("userLogins", RelationDescriptor::has_many("user_logins", "user_id", "id"))
            .with(
                "userNameAndEmail",
                RelationDescriptor::has_one("users", "id", "id").fields(["name", "email"]),
            )
            .with(
                "roles",
                RelationDescriptor::belongs_to_many(
                    "roles",
                    Pivot {
                        table: "role_user".into(),
                        parent_key: "user_id".into(),
                        related_key: "role_id".into(),
                    },
                    "id",
                    "id",
                )
                .field("title"),
            )
    }

    fn project(&self, row: &Row) -> Result<Record> {
        let cell = |name: &str| {
            row.get(name)
                .map(Value::to_json)
                .ok_or_else(|| DatatablesError::Mapping(format!("missing column {name}")))
        };

        let mut record = Record::new();
        for name in ["id", "name", "email", "created_at", "updated_at", "country_id", "settings"] {
            record.insert(name.into(), cell(name)?);
        }
        record.insert("userLogins".into(), cell("user_logins_count")?);
        let name_and_email = format!(
            "{} {}",
            row.get("name").and_then(Value::as_str).unwrap_or_default(),
            row.get("email").and_then(Value::as_str).unwrap_or_default(),
        );
        record.insert("userNameAndEmail".into(), name_and_email.into());
        Ok(record)
    }

    fn searchable(&self) -> Option<&dyn Searchable> {
        Some(self)
    }

    fn scopable(&self) -> Option<&dyn Scopable> {
        Some(self)
    }

    fn eager_loading(&self, query: &mut SelectQuery) {
        let alias = query.next_alias();
        let logins = Subquery::new("user_logins", alias.clone()).filter(Predicate::eq(
            Expr::column(alias, "user_id"),
            Expr::column("users", "id"),
        ));
        query.select_extra(Expr::count(logins), "user_logins_count");
    }
}

/// Comments on either a user or a country
pub struct Comments {
    table: Table,
}

impl Comments {
    pub fn new() -> Self {
        Self {
            table: Table::new("comments")
                .column("id", ColumnType::Integer)
                .column("body", ColumnType::Text)
                .column("commentable_type", ColumnType::Text)
                .column("commentable_id", ColumnType::Integer),
        }
    }
}

impl Entity for Comments {
    fn table(&self) -> &Table {
        &self.table
    }

    fn relations(&self) -> RelationCatalog {
        RelationCatalog::new().with(
            "commentable",
            RelationDescriptor::morph_to("commentable_type", "commentable_id")
                .morph_group(MorphGroup::new(["name", "email"]).target("user", "users", "id"))
                .morph_group(MorphGroup::new(["name"]).target("country", "countries", "id")),
        )
    }

    fn project(&self, row: &Row) -> Result<Record> {
        Ok(row.to_record())
    }
}

pub fn filters() -> FilterConfig {
    FilterConfig::default().with_date_columns(["founded_at"])
}

/// Every column of [`Users`], first page of 20, ordered by name
pub fn request_sample() -> Json {
    let columns: Vec<Json> = [
        "id",
        "name",
        "email",
        "created_at",
        "updated_at",
        "country",
        "userLogins",
        "settings",
        "userNameAndEmail",
        "roles",
    ]
    .into_iter()
    .map(|data| json!({ "data": data, "search": { "value": "" } }))
    .collect();

    json!({
        "draw": 1,
        "columns": columns,
        "start": 0,
        "length": 20,
        "search": { "value": "" },
        "order": [{ "column": 1, "dir": "asc" }],
    })
}

/// Every comment with its polymorphic owner searched by `term`
pub fn comments_request(term: &str) -> Json {
    json!({
        "draw": 1,
        "columns": [
            { "data": "id" },
            { "data": "body" },
            { "data": "commentable", "search": { "value": term } }
        ],
        "length": -1,
        "order": [{ "column": 0, "dir": "asc" }],
    })
}

pub fn ids(envelope: &ResultEnvelope) -> Vec<i64> {
    envelope
        .data
        .iter()
        .filter_map(|record| record.get("id").and_then(Json::as_i64))
        .collect()
}
