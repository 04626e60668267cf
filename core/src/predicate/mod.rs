//! Predicate tree
//!
//! Planners build predicates bottom-up as plain values and hand them to the
//! [`SelectQuery`](crate::query::SelectQuery) once; nothing is rendered until
//! the dialect is known. Empty `All`/`Any` groups render as no constraint.

mod expr;
mod subquery;

pub use expr::*;
pub use subquery::*;

use crate::dialect::Dialect;
use crate::sql::{SQL, Token};
use crate::value::Value;

/// Comparison operator of [`Predicate::Compare`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const fn token(self) -> Token {
        match self {
            CompareOp::Eq => Token::EQ,
            CompareOp::Ne => Token::NE,
            CompareOp::Lt => Token::LT,
            CompareOp::Le => Token::LE,
            CompareOp::Gt => Token::GT,
            CompareOp::Ge => Token::GE,
        }
    }
}

/// A boolean condition over the base table and its relations.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Every child holds
    All(Vec<Predicate>),
    /// At least one child holds
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
    Compare {
        left: Expr,
        op: CompareOp,
        right: Expr,
    },
    /// Case-insensitive pattern match
    Like { expr: Expr, pattern: Value },
    In { expr: Expr, values: Vec<Value> },
    IsNull(Expr),
    /// Some value of the JSON document in `expr` contains `needle`, ignoring case
    JsonContains { expr: Expr, needle: String },
    Exists(Box<Subquery>),
    /// A pre-built fragment, e.g. from an entity's own search predicate
    Sql(SQL),
    /// Matches no row
    Never,
}

impl Predicate {
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::All(predicates.into_iter().collect())
    }

    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Any(predicates.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(predicate: Predicate) -> Self {
        Predicate::Not(Box::new(predicate))
    }

    pub fn compare(left: impl Into<Expr>, op: CompareOp, right: impl Into<Expr>) -> Self {
        Predicate::Compare {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    pub fn eq(left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Self::compare(left, CompareOp::Eq, right)
    }

    pub fn like(expr: impl Into<Expr>, pattern: impl Into<Value>) -> Self {
        Predicate::Like {
            expr: expr.into(),
            pattern: pattern.into(),
        }
    }

    /// Substring match: `expr LIKE '%needle%'`
    pub fn contains(expr: impl Into<Expr>, needle: &str) -> Self {
        Self::like(expr, format!("%{needle}%"))
    }

    pub fn in_list(expr: impl Into<Expr>, values: impl IntoIterator<Item = Value>) -> Self {
        Predicate::In {
            expr: expr.into(),
            values: values.into_iter().collect(),
        }
    }

    pub fn is_null(expr: impl Into<Expr>) -> Self {
        Predicate::IsNull(expr.into())
    }

    pub fn json_contains(expr: impl Into<Expr>, needle: impl Into<String>) -> Self {
        Predicate::JsonContains {
            expr: expr.into(),
            needle: needle.into(),
        }
    }

    pub fn exists(subquery: Subquery) -> Self {
        Predicate::Exists(Box::new(subquery))
    }

    /// Whether this predicate renders as no constraint at all
    pub fn is_trivial(&self) -> bool {
        match self {
            Predicate::All(children) | Predicate::Any(children) => {
                children.iter().all(Predicate::is_trivial)
            }
            Predicate::Not(inner) => inner.is_trivial(),
            Predicate::Sql(sql) => sql.is_empty(),
            _ => false,
        }
    }

    /// Renders the predicate; trivial predicates render as an empty fragment.
    pub fn to_sql(&self, dialect: Dialect) -> SQL {
        match self {
            Predicate::All(children) => group(children, Token::AND, dialect),
            Predicate::Any(children) => group(children, Token::OR, dialect),
            Predicate::Not(inner) => match inner.as_ref() {
                Predicate::Exists(subquery) => SQL::token(Token::NOT)
                    .push(Token::EXISTS)
                    .append(subquery.to_sql(SQL::number(1), dialect).parens()),
                inner => {
                    let sql = inner.to_sql(dialect);
                    if sql.is_empty() {
                        sql
                    } else {
                        SQL::token(Token::NOT).append(sql.parens())
                    }
                }
            },
            Predicate::Compare { left, op, right } => left
                .to_sql(dialect)
                .push(op.token())
                .append(right.to_sql(dialect)),
            Predicate::Like { expr, pattern } => dialect
                .text_of(expr.to_sql(dialect))
                .push(dialect.like())
                .append(SQL::param(pattern.clone())),
            Predicate::In { expr, values } => {
                if values.is_empty() {
                    return Predicate::Never.to_sql(dialect);
                }
                expr.to_sql(dialect)
                    .push(Token::IN)
                    .append(SQL::param_list(values.iter().cloned()).parens())
            }
            Predicate::IsNull(expr) => expr.to_sql(dialect).push(Token::IS).push(Token::NULL),
            Predicate::JsonContains { expr, needle } => dialect.json_values_like(
                expr.to_sql(dialect),
                Value::Text(format!("%{}%", needle.to_lowercase())),
            ),
            Predicate::Exists(subquery) => SQL::token(Token::EXISTS)
                .append(subquery.to_sql(SQL::number(1), dialect).parens()),
            Predicate::Sql(sql) => {
                if sql.chunks.len() > 1 {
                    sql.clone().parens()
                } else {
                    sql.clone()
                }
            }
            Predicate::Never => SQL::raw("1 = 0"),
        }
    }
}

pub(crate) fn group(children: &[Predicate], separator: Token, dialect: Dialect) -> SQL {
    let mut rendered = children
        .iter()
        .map(|p| p.to_sql(dialect))
        .filter(|sql| !sql.is_empty());

    let Some(first) = rendered.next() else {
        return SQL::empty();
    };
    let Some(second) = rendered.next() else {
        return first;
    };
    SQL::join(
        core::iter::once(first)
            .chain(core::iter::once(second))
            .chain(rendered),
        separator,
    )
    .parens()
}
