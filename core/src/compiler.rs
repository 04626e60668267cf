//! Request-to-query compiler.
//!
//! One [`Compiler`] serves one request. Each stage is a method that consumes
//! the compiler and returns it in the next state, so stages can only run once
//! and only in order:
//!
//! `Init → Filtered → Sorted → TotalCounted → Searched → FilteredCounted → Fetched → ResultEnvelope`
//!
//! [`respond`] runs the whole chain.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::config::FilterConfig;
use crate::entity::{Entity, Scopable, Searchable};
use crate::envelope::ResultEnvelope;
use crate::error::Result;
use crate::planner::{PlanContext, filter, search, sort};
use crate::query::{Page, SelectQuery};
use crate::relation::RelationCatalog;
use crate::request::{Length, RequestSpec};
use crate::storage::{Row, Storage};
use crate::{datatables_trace_query, datatables_trace_stage};

//------------------------------------------------------------------------------
// Type State Markers
//------------------------------------------------------------------------------

/// Marker for a freshly created compiler
#[derive(Debug, Clone, Copy, Default)]
pub struct Init;

/// Marker for the state after scope and extra filters
#[derive(Debug, Clone, Copy, Default)]
pub struct Filtered;

/// Marker for the state after ordering
#[derive(Debug, Clone, Copy, Default)]
pub struct Sorted;

/// Marker for the state after the total count
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalCounted;

/// Marker for the state after global and per-column search
#[derive(Debug, Clone, Copy, Default)]
pub struct Searched;

/// Marker for the state after the filtered count
#[derive(Debug, Clone, Copy, Default)]
pub struct FilteredCounted;

/// Marker for the state after the page fetch
#[derive(Debug, Clone, Copy, Default)]
pub struct Fetched;

//------------------------------------------------------------------------------
// Compiler Definition
//------------------------------------------------------------------------------

/// Compiles and runs one request; capabilities are resolved in [`Compiler::new`].
pub struct Compiler<'a, E: ?Sized, S, State = Init> {
    entity: &'a E,
    storage: S,
    request: &'a RequestSpec,
    filters: &'a FilterConfig,
    catalog: RelationCatalog,
    searchable: Option<&'a dyn Searchable>,
    scopable: Option<&'a dyn Scopable>,
    query: SelectQuery,
    records_total: u64,
    records_filtered: u64,
    search_occurred: bool,
    rows: Vec<Row>,
    state: PhantomData<State>,
}

impl<'a, E, S, State> Compiler<'a, E, S, State>
where
    E: Entity + ?Sized,
    S: Storage,
{
    /// The query as built so far
    #[inline]
    pub fn query(&self) -> &SelectQuery {
        &self.query
    }

    fn count(&mut self) -> Result<u64> {
        let sql = self.query.count_sql(self.storage.dialect());
        datatables_trace_query!(sql.sql(self.storage.dialect()), sql.params().count());
        self.storage.count(&sql)
    }

    fn into_state<Next>(self) -> Compiler<'a, E, S, Next> {
        Compiler {
            entity: self.entity,
            storage: self.storage,
            request: self.request,
            filters: self.filters,
            catalog: self.catalog,
            searchable: self.searchable,
            scopable: self.scopable,
            query: self.query,
            records_total: self.records_total,
            records_filtered: self.records_filtered,
            search_occurred: self.search_occurred,
            rows: self.rows,
            state: PhantomData,
        }
    }
}

impl<'a, E, S> Compiler<'a, E, S, Init>
where
    E: Entity + ?Sized,
    S: Storage,
{
    pub fn new(entity: &'a E, storage: S, request: &'a RequestSpec, filters: &'a FilterConfig) -> Self {
        datatables_trace_stage!("init", entity.table().name());
        Self {
            entity,
            storage,
            request,
            filters,
            catalog: entity.relations(),
            searchable: entity.searchable(),
            scopable: entity.scopable(),
            query: SelectQuery::new(entity.table().name()),
            records_total: 0,
            records_filtered: 0,
            search_occurred: false,
            rows: Vec::new(),
            state: PhantomData,
        }
    }

    /// Applies the named scope and extra filters, then the eager-loading hint
    pub fn filter(mut self) -> Compiler<'a, E, S, Filtered> {
        if let Some(scope) = &self.request.scope {
            filter::apply_scope(&mut self.query, self.scopable, scope);
        }
        if !self.request.extra_where.is_empty() {
            filter::apply_extra_filters(&mut self.query, &self.request.extra_where);
        }
        self.entity.eager_loading(&mut self.query);

        datatables_trace_stage!("filtered", self.entity.table().name());
        self.into_state()
    }
}

impl<'a, E, S> Compiler<'a, E, S, Filtered>
where
    E: Entity + ?Sized,
    S: Storage,
{
    /// Orders by the first order entry, if it names a known field
    pub fn sort(mut self) -> Compiler<'a, E, S, Sorted> {
        if let Some((index, direction)) = self.request.sort()
            && let Some(field) = self.request.field(index)
        {
            let ctx = PlanContext::new(self.entity.table(), &self.catalog, self.filters);
            sort::apply(&mut self.query, &ctx, field, direction);
        }

        datatables_trace_stage!("sorted", self.entity.table().name());
        self.into_state()
    }
}

impl<'a, E, S> Compiler<'a, E, S, Sorted>
where
    E: Entity + ?Sized,
    S: Storage,
{
    /// Counts every row the scope and extra filters allow
    pub fn count_total(mut self) -> Result<Compiler<'a, E, S, TotalCounted>> {
        self.records_total = self.count()?;

        datatables_trace_stage!("total_counted", self.entity.table().name());
        Ok(self.into_state())
    }
}

impl<'a, E, S> Compiler<'a, E, S, TotalCounted>
where
    E: Entity + ?Sized,
    S: Storage,
{
    #[inline]
    pub fn records_total(&self) -> u64 {
        self.records_total
    }

    /// Applies the global term, then every per-column search value
    pub fn search(mut self) -> Result<Compiler<'a, E, S, Searched>> {
        let global = search::apply_global(
            &mut self.query,
            self.entity.table().name(),
            self.searchable,
            &self.request.search.value,
        )?;

        let ctx = PlanContext::new(self.entity.table(), &self.catalog, self.filters);
        let by_column = search::apply_columns(&mut self.query, &ctx, &self.request.columns)?;
        self.search_occurred = global || by_column;

        datatables_trace_stage!("searched", self.entity.table().name());
        Ok(self.into_state())
    }
}

impl<'a, E, S> Compiler<'a, E, S, Searched>
where
    E: Entity + ?Sized,
    S: Storage,
{
    /// Re-counts only when a search narrowed the query
    pub fn count_filtered(mut self) -> Result<Compiler<'a, E, S, FilteredCounted>> {
        self.records_filtered = if self.search_occurred {
            self.count()?
        } else {
            self.records_total
        };

        datatables_trace_stage!("filtered_counted", self.entity.table().name());
        Ok(self.into_state())
    }
}

impl<'a, E, S> Compiler<'a, E, S, FilteredCounted>
where
    E: Entity + ?Sized,
    S: Storage,
{
    #[inline]
    pub fn records_filtered(&self) -> u64 {
        self.records_filtered
    }

    /// Fetches the requested page, or every row when the length is "all"
    pub fn fetch(mut self) -> Result<Compiler<'a, E, S, Fetched>> {
        let page = match self.request.length {
            Length::All => None,
            Length::Rows(limit) => Some(Page {
                offset: self.request.start,
                limit,
            }),
        };

        let dialect = self.storage.dialect();
        let sql = self.query.select_sql(dialect, page);
        datatables_trace_query!(sql.sql(dialect), sql.params().count());
        self.rows = self.storage.fetch(&sql)?;

        datatables_trace_stage!("fetched", self.entity.table().name());
        Ok(self.into_state())
    }
}

impl<'a, E, S> Compiler<'a, E, S, Fetched>
where
    E: Entity + ?Sized,
    S: Storage,
{
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Projects every fetched row, in fetch order, into the envelope
    pub fn project(self) -> Result<ResultEnvelope> {
        let data = self
            .rows
            .iter()
            .map(|row| self.entity.project(row))
            .collect::<Result<Vec<_>>>()?;

        datatables_trace_stage!("projected", self.entity.table().name());
        Ok(ResultEnvelope {
            draw: self.request.draw.clone(),
            records_total: self.records_total,
            records_filtered: self.records_filtered,
            data,
        })
    }
}

impl<E: ?Sized, S, State> Debug for Compiler<'_, E, S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("query", &self.query)
            .field("records_total", &self.records_total)
            .field("records_filtered", &self.records_filtered)
            .field("search_occurred", &self.search_occurred)
            .field("rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}

/// Compiles `request` against `entity`, runs it on `storage` and builds the response.
pub fn respond<E, S>(
    entity: &E,
    storage: S,
    request: &RequestSpec,
    filters: &FilterConfig,
) -> Result<ResultEnvelope>
where
    E: Entity + ?Sized,
    S: Storage,
{
    Compiler::new(entity, storage, request, filters)
        .filter()
        .sort()
        .count_total()?
        .search()?
        .count_filtered()?
        .fetch()?
        .project()
}
