//! # Datatables for Rust
//!
//! Compiles DataTables-style table view requests (paging, ordering, global
//! and per-column search, named scopes, extra filters) into parameterized SQL,
//! runs them and answers with `{draw, recordsTotal, recordsFiltered, data}`.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "rusqlite")]
//! # fn main() -> datatables::Result<()> {
//! use datatables::prelude::*;
//! use datatables::sqlite::SqliteStorage;
//!
//! struct Users(Table);
//!
//! impl Entity for Users {
//!     fn table(&self) -> &Table {
//!         &self.0
//!     }
//!
//!     fn project(&self, row: &Row) -> Result<Record> {
//!         Ok(row.to_record())
//!     }
//! }
//!
//! let conn = rusqlite::Connection::open_in_memory().unwrap();
//! conn.execute_batch(
//!     "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
//!      INSERT INTO users (name) VALUES ('George'), ('Maria');",
//! )
//! .unwrap();
//!
//! let users = Users(
//!     Table::new("users")
//!         .column("id", ColumnType::Integer)
//!         .column("name", ColumnType::Text),
//! );
//! let request = RequestSpec::from_json(
//!     r#"{"draw": 1, "start": 0, "length": 10,
//!         "columns": [{"data": "name", "search": {"value": "geo"}}]}"#,
//! )?;
//!
//! let envelope = respond(&users, SqliteStorage::new(&conn), &request, &FilterConfig::default())?;
//! assert_eq!(envelope.records_total, 2);
//! assert_eq!(envelope.records_filtered, 1);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "rusqlite"))]
//! # fn main() {}
//! ```
//!
//! ## Database Support
//!
//! | Database   | Driver   | Feature Flag    |
//! |------------|----------|-----------------|
//! | SQLite     | rusqlite | `rusqlite`      |
//! | PostgreSQL | postgres | `postgres-sync` |

#![cfg_attr(docsrs, feature(doc_cfg))]

// =============================================================================
// Root-level exports
// =============================================================================

/// Result type for datatables operations
pub use datatables_core::error::Result;

/// Database dialect enum
pub use datatables_core::Dialect;

/// Compile, run and project one request
pub use datatables_core::compiler::respond;

/// Error types
pub mod error {
    pub use datatables_core::config::ConfigError;
    pub use datatables_core::error::DatatablesError;
}

/// Core types shared by every storage.
///
/// # Module Structure
///
/// - **Model**: `Table`, `Column`, `RelationDescriptor`, `RelationCatalog`
/// - **Request**: `RequestSpec` and its parts
/// - **Building**: `SQL`, `Predicate`, `Expr`, `Subquery`, `SelectQuery`
/// - **Running**: `Compiler`, `Storage`, `Row`, `ResultEnvelope`
pub mod core {
    pub use datatables_core::compiler::{
        Compiler, Fetched, Filtered, FilteredCounted, Init, Searched, Sorted, TotalCounted,
    };
    pub use datatables_core::config::{CONFIG_FILE, Config, FilterConfig};
    pub use datatables_core::{
        Aggregate, ColumnSpec, CompareOp, Expr, FilterValue, Join, JoinType, Length, OrderSpec, Page, Predicate,
        RequestSpec, ResultEnvelope, Scope, SearchSpec, SelectQuery, Subquery,
    };
    pub use datatables_core::{Column, ColumnType, OrderBy, Table};
    pub use datatables_core::{
        MorphGroup, NestedLeaf, Pivot, RelationCatalog, RelationDescriptor, SearchField,
    };
    pub use datatables_core::{Record, Row, SQL, SQLChunk, Storage, Token, Value};

    // Sub-modules for advanced use
    pub use datatables_core::{planner, request};
}

// =============================================================================
// SQLite module
// =============================================================================

/// SQLite storage over `rusqlite`.
#[cfg(feature = "rusqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "rusqlite")))]
pub mod sqlite {
    pub use datatables_sqlite::{SqliteParam, SqliteStorage};
}

// =============================================================================
// PostgreSQL module
// =============================================================================

/// PostgreSQL storage over the blocking `postgres` client.
#[cfg(feature = "postgres-sync")]
#[cfg_attr(docsrs, doc(cfg(feature = "postgres-sync")))]
pub mod postgres {
    pub use datatables_postgres::{PgParam, PostgresStorage};
}

/// Everything needed to declare an entity and serve a request.
pub mod prelude {
    pub use crate::core::{
        ColumnType, Config, Expr, FilterConfig, Predicate, Record, RelationCatalog,
        RelationDescriptor, RequestSpec, Row, Table, Value,
    };
    pub use crate::respond;
    pub use datatables_core::entity::{Entity, Scopable, Searchable};
    pub use datatables_core::error::Result;
}
