//! Scalar expressions used on either side of a predicate.

use compact_str::CompactString;

use crate::dialect::Dialect;
use crate::sql::{SQL, Token};
use crate::value::Value;

use super::Subquery;

/// Aggregate function of [`Expr::Aggregate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    Min,
    Max,
}

impl Aggregate {
    pub const fn name(self) -> &'static str {
        match self {
            Aggregate::Count => "COUNT",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
        }
    }
}

/// A dialect-neutral scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `"table"."name"`; `table` is the alias the column is reached through
    Column {
        table: CompactString,
        name: CompactString,
    },
    /// Calendar date of the inner expression as `YYYY-MM-DD` text
    Date(Box<Expr>),
    /// The inner expression rendered with a strftime-style display format
    FormatDate(Box<Expr>, String),
    /// `(SELECT func(arg) FROM ... WHERE ...)`; `COUNT(*)` when `arg` is `None`
    Aggregate {
        func: Aggregate,
        arg: Option<Box<Expr>>,
        subquery: Box<Subquery>,
    },
    /// A bound parameter
    Value(Value),
}

impl Expr {
    #[inline]
    pub fn column(table: impl Into<CompactString>, name: impl Into<CompactString>) -> Self {
        Expr::Column {
            table: table.into(),
            name: name.into(),
        }
    }

    #[inline]
    pub fn value(value: impl Into<Value>) -> Self {
        Expr::Value(value.into())
    }

    pub fn date(self) -> Self {
        Expr::Date(Box::new(self))
    }

    pub fn format_date(self, format: impl Into<String>) -> Self {
        Expr::FormatDate(Box::new(self), format.into())
    }

    /// Number of rows the subquery matches
    pub fn count(subquery: Subquery) -> Self {
        Expr::Aggregate {
            func: Aggregate::Count,
            arg: None,
            subquery: Box::new(subquery),
        }
    }

    /// Smallest `arg` over the rows the subquery matches
    pub fn min(subquery: Subquery, arg: Expr) -> Self {
        Expr::Aggregate {
            func: Aggregate::Min,
            arg: Some(Box::new(arg)),
            subquery: Box::new(subquery),
        }
    }

    /// Largest `arg` over the rows the subquery matches
    pub fn max(subquery: Subquery, arg: Expr) -> Self {
        Expr::Aggregate {
            func: Aggregate::Max,
            arg: Some(Box::new(arg)),
            subquery: Box::new(subquery),
        }
    }

    pub fn to_sql(&self, dialect: Dialect) -> SQL {
        match self {
            Expr::Column { table, name } => SQL::column(table.clone(), name.clone()),
            Expr::Date(inner) => dialect.date_of(inner.to_sql(dialect)),
            Expr::FormatDate(inner, format) => dialect.format_date(inner.to_sql(dialect), format),
            Expr::Aggregate { func, arg, subquery } => {
                let arg = arg
                    .as_ref()
                    .map_or_else(|| SQL::token(Token::STAR), |arg| arg.to_sql(dialect));
                subquery.to_sql(SQL::func(func.name(), arg), dialect).parens()
            }
            Expr::Value(value) => SQL::param(value.clone()),
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}
