//! JOIN clauses attached to the base select by the sort planner.

use compact_str::CompactString;

use crate::dialect::Dialect;
use crate::predicate::Predicate;
use crate::sql::{SQL, Token};

/// The type of JOIN operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Left,
    Inner,
}

impl JoinType {
    fn to_sql(self) -> SQL {
        match self {
            JoinType::Left => SQL::token(Token::LEFT).push(Token::JOIN),
            JoinType::Inner => SQL::token(Token::INNER).push(Token::JOIN),
        }
    }
}

/// `<type> JOIN "table" AS "alias" ON <condition>`
#[derive(Clone, Debug, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: CompactString,
    pub alias: CompactString,
    pub on: Predicate,
}

impl Join {
    pub fn left(table: impl Into<CompactString>, alias: impl Into<CompactString>, on: Predicate) -> Self {
        Self {
            join_type: JoinType::Left,
            table: table.into(),
            alias: alias.into(),
            on,
        }
    }

    pub fn inner(table: impl Into<CompactString>, alias: impl Into<CompactString>, on: Predicate) -> Self {
        Self {
            join_type: JoinType::Inner,
            ..Self::left(table, alias, on)
        }
    }

    pub fn to_sql(&self, dialect: Dialect) -> SQL {
        self.join_type
            .to_sql()
            .append(SQL::ident(self.table.clone()).alias(self.alias.clone()))
            .push(Token::ON)
            .append(self.on.to_sql(dialect))
    }
}
