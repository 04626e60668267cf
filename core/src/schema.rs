//! Entity model: table name, primary key and typed columns.

use compact_str::CompactString;
use serde::Deserialize;

use crate::sql::{SQL, Token};

/// Storage type of a column, as far as the compiler cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Boolean,
    Date,
    DateTime,
    Json,
    Blob,
}

/// A physical column of an entity's table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: CompactString,
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<CompactString>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// The table an entity maps to.
///
/// ```
/// use datatables_core::schema::{ColumnType, Table};
///
/// let users = Table::new("users")
///     .column("id", ColumnType::Integer)
///     .column("name", ColumnType::Text)
///     .column("settings", ColumnType::Json);
///
/// assert_eq!(users.primary_key(), "id");
/// assert_eq!(users.column_type("settings"), Some(ColumnType::Json));
/// assert!(users.column_type("missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: CompactString,
    primary_key: CompactString,
    columns: Vec<Column>,
}

impl Table {
    /// Creates a table whose primary key is `id`
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            primary_key: CompactString::const_new("id"),
            columns: Vec::new(),
        }
    }

    pub fn with_primary_key(mut self, key: impl Into<CompactString>) -> Self {
        self.primary_key = key.into();
        self
    }

    pub fn column(mut self, name: impl Into<CompactString>, ty: ColumnType) -> Self {
        self.columns.push(Column::new(name, ty));
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.ty)
    }

    #[inline]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_type(name).is_some()
    }
}

/// Sort direction for ORDER BY clauses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Asc,
    Desc,
}

impl OrderBy {
    /// Parses `asc` / `desc` (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(OrderBy::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(OrderBy::Desc)
        } else {
            None
        }
    }

    pub const fn token(&self) -> Token {
        match self {
            OrderBy::Asc => Token::ASC,
            OrderBy::Desc => Token::DESC,
        }
    }
}

impl From<OrderBy> for SQL {
    fn from(value: OrderBy) -> Self {
        SQL::token(value.token())
    }
}
