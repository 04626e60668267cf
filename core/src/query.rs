//! The select under construction for one request.
//!
//! Planners mutate a single [`SelectQuery`] in sequence; it is rendered twice
//! for counting (before and after search) and once for the page fetch.

use compact_str::CompactString;

use crate::dialect::Dialect;
use crate::join::Join;
use crate::predicate::{Expr, Predicate};
use crate::schema::OrderBy;
use crate::sql::{SQL, SQLChunk, Token};

/// Which base columns are selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// `SELECT *`
    #[default]
    All,
    /// `SELECT "table".*`, so joined tables cannot shadow base columns
    Base,
}

/// Page window of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

/// A derived output column: `<expr> AS "alias"`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraColumn {
    pub expr: Expr,
    pub alias: CompactString,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: CompactString,
    selection: Selection,
    extra_columns: Vec<ExtraColumn>,
    joins: Vec<Join>,
    filters: Vec<Predicate>,
    order_by: Vec<(Expr, OrderBy)>,
    next_alias: usize,
}

impl SelectQuery {
    pub fn new(table: impl Into<CompactString>) -> Self {
        Self {
            table: table.into(),
            selection: Selection::All,
            extra_columns: Vec::new(),
            joins: Vec::new(),
            filters: Vec::new(),
            order_by: Vec::new(),
            next_alias: 0,
        }
    }

    #[inline]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// A fresh subquery alias: `r0`, `r1`, ...
    pub fn next_alias(&mut self) -> CompactString {
        let alias = compact_str::format_compact!("r{}", self.next_alias);
        self.next_alias += 1;
        alias
    }

    pub fn select_base_columns(&mut self) -> &mut Self {
        self.selection = Selection::Base;
        self
    }

    /// Adds `<expr> AS "alias"` to the select list
    pub fn select_extra(&mut self, expr: Expr, alias: impl Into<CompactString>) -> &mut Self {
        self.extra_columns.push(ExtraColumn {
            expr,
            alias: alias.into(),
        });
        self
    }

    #[inline]
    pub fn has_join(&self, alias: &str) -> bool {
        self.joins.iter().any(|j| j.alias == alias)
    }

    /// Adds a join unless one with the same alias is already attached
    pub fn join(&mut self, join: Join) -> &mut Self {
        if !self.has_join(&join.alias) {
            self.joins.push(join);
        }
        self
    }

    /// ANDs a predicate into the WHERE clause; trivial predicates are dropped
    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        if !predicate.is_trivial() {
            self.filters.push(predicate);
        }
        self
    }

    pub fn order_by(&mut self, expr: Expr, direction: OrderBy) -> &mut Self {
        self.order_by.push((expr, direction));
        self
    }

    #[inline]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    #[inline]
    pub fn filters(&self) -> &[Predicate] {
        &self.filters
    }

    #[inline]
    pub fn ordering(&self) -> &[(Expr, OrderBy)] {
        &self.order_by
    }

    /// `SELECT ... FROM ... [JOIN ...] [WHERE ...]` without ordering or paging
    fn body(&self, dialect: Dialect) -> SQL {
        let mut sql = SQL::token(Token::SELECT);

        let base = match self.selection {
            Selection::All => SQL::token(Token::STAR),
            Selection::Base => SQL::ident(self.table.clone())
                .push(Token::DOT)
                .push(Token::STAR),
        };
        let columns = core::iter::once(base).chain(
            self.extra_columns
                .iter()
                .map(|c| c.expr.to_sql(dialect).alias(c.alias.clone())),
        );
        sql.append_mut(SQL::join(columns, Token::COMMA));

        sql.push_mut(Token::FROM);
        sql.push_mut(SQLChunk::ident(self.table.clone()));

        for join in &self.joins {
            sql.append_mut(join.to_sql(dialect));
        }

        let filter = crate::predicate::group(&self.filters, Token::AND, dialect);
        if !filter.is_empty() {
            sql.push_mut(Token::WHERE);
            sql.append_mut(filter);
        }
        sql
    }

    /// The page query: body, ORDER BY, and LIMIT/OFFSET when a page is given
    pub fn select_sql(&self, dialect: Dialect, page: Option<Page>) -> SQL {
        let mut sql = self.body(dialect);

        if !self.order_by.is_empty() {
            sql.push_mut(Token::ORDER);
            sql.push_mut(Token::BY);
            let terms = self
                .order_by
                .iter()
                .map(|(expr, direction)| expr.to_sql(dialect).push(direction.token()));
            sql.append_mut(SQL::join(terms, Token::COMMA));
        }

        if let Some(page) = page {
            sql.push_mut(Token::LIMIT);
            sql.push_mut(SQLChunk::Number(page.limit));
            sql.push_mut(Token::OFFSET);
            sql.push_mut(SQLChunk::Number(page.offset));
        }
        sql
    }

    /// `SELECT COUNT(*) FROM (<body>) AS "aggregate"`
    pub fn count_sql(&self, dialect: Dialect) -> SQL {
        SQL::token(Token::SELECT)
            .append(SQL::func("COUNT", SQL::token(Token::STAR)))
            .push(Token::FROM)
            .append(self.body(dialect).parens().alias("aggregate"))
    }
}
