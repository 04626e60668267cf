//! What an entity must provide to be served as a table.
//!
//! ```
//! use datatables_core::entity::{Entity, Searchable};
//! use datatables_core::error::Result;
//! use datatables_core::predicate::{Expr, Predicate};
//! use datatables_core::schema::{ColumnType, Table};
//! use datatables_core::storage::{Record, Row};
//!
//! struct Users {
//!     table: Table,
//! }
//!
//! impl Searchable for Users {
//!     fn search(&self, term: &str) -> Predicate {
//!         Predicate::any([
//!             Predicate::contains(Expr::column("users", "name"), term),
//!             Predicate::contains(Expr::column("users", "email"), term),
//!         ])
//!     }
//! }
//!
//! impl Entity for Users {
//!     fn table(&self) -> &Table {
//!         &self.table
//!     }
//!
//!     fn project(&self, row: &Row) -> Result<Record> {
//!         Ok(row.to_record())
//!     }
//!
//!     fn searchable(&self) -> Option<&dyn Searchable> {
//!         Some(self)
//!     }
//! }
//!
//! let users = Users {
//!     table: Table::new("users")
//!         .column("id", ColumnType::Integer)
//!         .column("name", ColumnType::Text)
//!         .column("email", ColumnType::Text),
//! };
//! assert!(users.searchable().is_some());
//! assert!(users.scopable().is_none());
//! ```

use crate::error::Result;
use crate::predicate::Predicate;
use crate::query::SelectQuery;
use crate::relation::RelationCatalog;
use crate::schema::Table;
use crate::storage::{Record, Row};
use crate::value::Value;

/// Free-text search over whatever fields the entity chooses
pub trait Searchable {
    /// Predicate matching one whitespace-free token
    fn search(&self, term: &str) -> Predicate;
}

/// Named, caller-selectable filters
pub trait Scopable {
    /// `None` when no scope is called `name`
    fn scope(&self, name: &str, args: &[Value]) -> Option<Predicate>;
}

pub trait Entity {
    fn table(&self) -> &Table;

    /// Relations for every logical field that is not a direct column
    fn relations(&self) -> RelationCatalog {
        RelationCatalog::new()
    }

    /// Maps one fetched row to its output record
    fn project(&self, row: &Row) -> Result<Record>;

    fn searchable(&self) -> Option<&dyn Searchable> {
        None
    }

    fn scopable(&self) -> Option<&dyn Scopable> {
        None
    }

    /// Attaches derived output columns before sorting. Must not filter or order.
    fn eager_loading(&self, _query: &mut SelectQuery) {}
}
