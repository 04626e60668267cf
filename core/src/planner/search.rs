//! Global free-text search and per-column search.

use chrono::NaiveDate;

use crate::config::{EXACT_MATCH_MARKER, FilterConfig};
use crate::entity::Searchable;
use crate::error::{DatatablesError, Result};
use crate::predicate::{CompareOp, Expr, Predicate, Subquery};
use crate::query::SelectQuery;
use crate::relation::{Morph, RelationDescriptor, SearchField};
use crate::request::ColumnSpec;
use crate::schema::ColumnType;
use crate::value::Value;

use super::{Field, PlanContext, related_rows};

/// ANDs the entity's search predicate once per whitespace-separated token.
///
/// Returns whether any token was applied. An empty term is a no-op even when
/// the entity cannot search.
pub fn apply_global(
    query: &mut SelectQuery,
    entity: &str,
    searchable: Option<&dyn Searchable>,
    term: &str,
) -> Result<bool> {
    if term.is_empty() {
        return Ok(false);
    }
    let Some(searchable) = searchable else {
        return Err(DatatablesError::MissingCapability {
            entity: entity.to_owned(),
            capability: "search",
        });
    };

    let mut occurred = false;
    for token in term.split_whitespace() {
        query.filter(searchable.search(token));
        occurred = true;
    }
    Ok(occurred)
}

/// ANDs one predicate per column carrying a search value.
///
/// Returns whether any column contributed a predicate.
pub fn apply_columns(query: &mut SelectQuery, ctx: &PlanContext<'_>, columns: &[ColumnSpec]) -> Result<bool> {
    let mut occurred = false;
    for spec in columns {
        let value = spec.search.value.as_str();
        if value.is_empty() {
            continue;
        }
        let Some(field) = spec.data.as_deref().and_then(|name| ctx.resolve(name)) else {
            continue;
        };

        let predicate = match field {
            Field::Column(column) => direct(ctx, &column.name, column.ty, value)?,
            Field::Relation(RelationDescriptor::MorphTo(morph)) => morph_to(query, ctx, morph, value),
            Field::Relation(relation) => related(query, ctx, relation, value)?,
        };

        if !predicate.is_trivial() {
            query.filter(predicate);
            occurred = true;
        }
    }
    Ok(occurred)
}

/// Inner value of `|value|`
fn exact_match(value: &str) -> Option<&str> {
    (value.len() >= 2 && value.starts_with(EXACT_MATCH_MARKER) && value.ends_with(EXACT_MATCH_MARKER))
        .then(|| value.trim_matches(EXACT_MATCH_MARKER))
}

/// `DATE(column) >= from AND DATE(column) <= to`, either side optional
fn date_range(column: &Expr, filters: &FilterConfig, value: &str) -> Result<Predicate> {
    let (from, to) = value
        .split_once(filters.date_delimiter.as_str())
        .unwrap_or((value, ""));

    let mut bounds = Vec::with_capacity(2);
    for (bound, op) in [(from, CompareOp::Ge), (to, CompareOp::Le)] {
        if bound.is_empty() {
            continue;
        }
        let date = NaiveDate::parse_from_str(bound, &filters.date_format).map_err(|source| {
            DatatablesError::DateParse {
                value: bound.to_owned(),
                format: filters.date_format.clone(),
                source,
            }
        })?;
        bounds.push(Predicate::compare(
            column.clone().date(),
            op,
            Value::Text(date.format("%Y-%m-%d").to_string()),
        ));
    }
    Ok(Predicate::All(bounds))
}

fn direct(ctx: &PlanContext<'_>, name: &str, ty: ColumnType, value: &str) -> Result<Predicate> {
    let filters = ctx.filters;
    let column = ctx.column(name);

    if value.contains(filters.date_delimiter.as_str()) {
        return date_range(&column, filters, value);
    }
    if value.contains(filters.null_delimiter.as_str()) {
        return Ok(Predicate::any([
            Predicate::eq(column.clone(), Value::from("")),
            Predicate::is_null(column),
        ]));
    }
    if let Some(inner) = exact_match(value) {
        return Ok(Predicate::eq(column, Value::from(inner)));
    }
    if ty == ColumnType::Json {
        return Ok(Predicate::json_contains(column, value));
    }
    Ok(Predicate::contains(column, value))
}

fn related(
    query: &mut SelectQuery,
    ctx: &PlanContext<'_>,
    relation: &RelationDescriptor,
    value: &str,
) -> Result<Predicate> {
    let base = ctx.table.name();
    let alias = query.next_alias();

    if value.contains(ctx.filters.null_delimiter.as_str()) {
        return Ok(related_rows(query, base, relation, alias, Predicate::any([]))
            .map(|rows| Predicate::not(Predicate::exists(rows)))
            .unwrap_or(Predicate::any([])));
    }

    let fields = relation.related().map(|r| r.fields.as_slice()).unwrap_or_default();
    let mut matches = Vec::with_capacity(fields.len());
    for field in fields {
        matches.push(sub_field(query, ctx, &alias, field, value)?);
    }
    let mut condition = Predicate::Any(matches);
    // Declared fields that all drop out match nothing, not every related row
    if !fields.is_empty() && condition.is_trivial() {
        condition = Predicate::Never;
    }

    Ok(related_rows(query, base, relation, alias, condition)
        .map(Predicate::exists)
        .unwrap_or(Predicate::any([])))
}

/// One entry of a relation's OR group, evaluated against the related row `alias`
fn sub_field(
    query: &mut SelectQuery,
    ctx: &PlanContext<'_>,
    alias: &str,
    field: &SearchField,
    value: &str,
) -> Result<Predicate> {
    let filters = ctx.filters;
    match field {
        SearchField::Column(name) => {
            let column = Expr::column(alias, name.clone());
            let is_date = filters.is_date_column(name);

            if value.contains(filters.date_delimiter.as_str()) {
                return date_range(&column, filters, value);
            }
            if let Some(inner) = exact_match(value) {
                return Ok(Predicate::eq(column, Value::from(inner)));
            }
            if is_date {
                let mut candidates = vec![value.to_owned()];
                if value.contains(['/', '-']) {
                    candidates.push(swap_date_separators(value));
                }
                return Ok(Predicate::any(candidates.iter().flat_map(|candidate| {
                    [
                        Predicate::contains(column.clone(), candidate),
                        Predicate::contains(
                            column.clone().format_date(filters.date_display_format.as_str()),
                            candidate,
                        ),
                    ]
                })));
            }
            Ok(Predicate::contains(column, value))
        }
        SearchField::Nested { through, leaf } => {
            let through_alias = query.next_alias();
            let leaf_matches = Predicate::any(
                leaf.columns()
                    .iter()
                    .map(|name| Predicate::contains(Expr::column(through_alias.clone(), name.clone()), value)),
            );
            Ok(related_rows(query, alias, through, through_alias, leaf_matches)
                .map(Predicate::exists)
                .unwrap_or(Predicate::any([])))
        }
    }
}

fn swap_date_separators(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' => '-',
            '-' => '/',
            other => other,
        })
        .collect()
}

/// For every group and target type: `type = tag AND EXISTS (target row matching any field)`
fn morph_to(query: &mut SelectQuery, ctx: &PlanContext<'_>, morph: &Morph, value: &str) -> Predicate {
    let mut branches = Vec::new();
    for group in &morph.groups {
        if group.fields.is_empty() {
            continue;
        }
        for target in &group.targets {
            let alias = query.next_alias();
            let matches = Predicate::any(
                group
                    .fields
                    .iter()
                    .map(|name| Predicate::contains(Expr::column(alias.clone(), name.clone()), value)),
            );
            let rows = Subquery::new(target.table.clone(), alias.clone())
                .filter(Predicate::eq(
                    Expr::column(alias, target.key.clone()),
                    ctx.column(&morph.id_column),
                ))
                .filter(matches);
            branches.push(Predicate::all([
                Predicate::eq(ctx.column(&morph.type_column), Value::from(target.tag.clone())),
                Predicate::exists(rows),
            ]));
        }
    }
    Predicate::Any(branches)
}
