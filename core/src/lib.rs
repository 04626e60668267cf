//! Core of the datatables request compiler.
//!
//! A [`RequestSpec`] (paging, ordering, global and per-column search, scope and
//! extra filters) is compiled against an [`Entity`] into a [`SelectQuery`],
//! executed through a [`Storage`] and answered with a [`ResultEnvelope`].

pub mod compiler;
pub mod config;
pub mod dialect;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod join;
pub mod planner;
pub mod predicate;
pub mod query;
pub mod relation;
pub mod request;
pub mod schema;
pub mod sql;
pub mod storage;
pub mod value;

#[macro_use]
mod tracing;

// Re-export key types and traits
pub use compiler::{Compiler, respond};
pub use config::{Config, ConfigError, FilterConfig};
pub use dialect::Dialect;
pub use entity::{Entity, Scopable, Searchable};
pub use envelope::ResultEnvelope;
pub use error::{DatatablesError, Result};
pub use join::{Join, JoinType};
pub use predicate::{Aggregate, CompareOp, Expr, Predicate, Subquery};
pub use query::{Page, SelectQuery};
pub use relation::{
    MorphGroup, NestedLeaf, Pivot, RelationCatalog, RelationDescriptor, SearchField,
};
pub use request::{ColumnSpec, FilterValue, Length, OrderSpec, RequestSpec, Scope, SearchSpec};
pub use schema::{Column, ColumnType, OrderBy, Table};
pub use sql::{SQL, SQLChunk, Token};
pub use storage::{Record, Row, Storage};
pub use value::Value;
