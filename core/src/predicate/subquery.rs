use compact_str::CompactString;

use crate::dialect::Dialect;
use crate::join::Join;
use crate::sql::{SQL, Token};

use super::Predicate;

/// A correlated subquery over one aliased table: `SELECT .. FROM table AS alias WHERE ..`.
///
/// The projection is chosen by the caller: `1` under `EXISTS`, `COUNT(*)`
/// when ordering by the number of related rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Subquery {
    pub table: CompactString,
    pub alias: CompactString,
    /// Inner joins, used to walk a pivot table
    pub joins: Vec<Join>,
    pub filter: Vec<Predicate>,
}

impl Subquery {
    pub fn new(table: impl Into<CompactString>, alias: impl Into<CompactString>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            joins: Vec::new(),
            filter: Vec::new(),
        }
    }

    pub fn join(
        mut self,
        table: impl Into<CompactString>,
        alias: impl Into<CompactString>,
        on: Predicate,
    ) -> Self {
        self.joins.push(Join::inner(table, alias, on));
        self
    }

    /// ANDs another condition into the WHERE clause
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter.push(predicate);
        self
    }

    pub fn to_sql(&self, projection: SQL, dialect: Dialect) -> SQL {
        let mut sql = SQL::token(Token::SELECT)
            .append(projection)
            .push(Token::FROM)
            .append(SQL::ident(self.table.clone()).alias(self.alias.clone()));

        for join in &self.joins {
            sql.append_mut(join.to_sql(dialect));
        }

        let filter = super::group(&self.filter, Token::AND, dialect);
        if !filter.is_empty() {
            sql.push_mut(Token::WHERE);
            sql.append_mut(filter);
        }
        sql
    }
}
