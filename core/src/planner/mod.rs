//! Planners: each turns one part of the request into joins, predicates
//! or ordering on the [`SelectQuery`].

pub mod filter;
pub mod search;
pub mod sort;

use compact_str::CompactString;

use crate::config::FilterConfig;
use crate::predicate::{Expr, Predicate, Subquery};
use crate::query::SelectQuery;
use crate::relation::{RelationCatalog, RelationDescriptor};
use crate::schema::{Column, Table};

/// A logical field resolved against the entity
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    Column(&'a Column),
    Relation(&'a RelationDescriptor),
}

/// What the planners read while building one request's query
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub table: &'a Table,
    pub catalog: &'a RelationCatalog,
    pub filters: &'a FilterConfig,
}

impl<'a> PlanContext<'a> {
    pub fn new(table: &'a Table, catalog: &'a RelationCatalog, filters: &'a FilterConfig) -> Self {
        Self {
            table,
            catalog,
            filters,
        }
    }

    /// Relations shadow columns of the same name; unknown names resolve to `None`.
    pub fn resolve(&self, name: &str) -> Option<Field<'a>> {
        if let Some(relation) = self.catalog.get(name) {
            return Some(Field::Relation(relation));
        }
        self.table
            .columns()
            .iter()
            .find(|c| c.name == name)
            .map(Field::Column)
    }

    #[inline]
    pub fn column(&self, name: &str) -> Expr {
        Expr::column(self.table.name(), name)
    }
}

/// `EXISTS`-ready subquery over the rows of `relation` belonging to the row
/// aliased `parent`, narrowed by `condition`. `None` for polymorphic relations.
pub(crate) fn related_rows(
    query: &mut SelectQuery,
    parent: &str,
    relation: &RelationDescriptor,
    alias: CompactString,
    condition: Predicate,
) -> Option<Subquery> {
    let subquery = match relation {
        RelationDescriptor::BelongsTo(related)
        | RelationDescriptor::HasMany(related)
        | RelationDescriptor::HasOne(related) => Subquery::new(related.table.clone(), alias.clone())
            .filter(Predicate::eq(
                Expr::column(alias, related.foreign_key.clone()),
                Expr::column(parent, related.local_key.clone()),
            )),
        RelationDescriptor::BelongsToMany { related, pivot } => {
            let pivot_alias = query.next_alias();
            Subquery::new(related.table.clone(), alias.clone())
                .join(
                    pivot.table.clone(),
                    pivot_alias.clone(),
                    Predicate::eq(
                        Expr::column(pivot_alias.clone(), pivot.related_key.clone()),
                        Expr::column(alias, related.foreign_key.clone()),
                    ),
                )
                .filter(Predicate::eq(
                    Expr::column(pivot_alias, pivot.parent_key.clone()),
                    Expr::column(parent, related.local_key.clone()),
                ))
        }
        RelationDescriptor::MorphTo(_) => return None,
    };
    Some(subquery.filter(condition))
}
