//! Named scopes and literal `extraWhere` filters.

use std::collections::BTreeMap;

use crate::config::WILDCARD_MARKER;
use crate::entity::Scopable;
use crate::predicate::{Expr, Predicate};
use crate::query::SelectQuery;
use crate::request::{FilterValue, Scope};
use crate::value::Value;

/// Applies a named scope. Unknown scopes are ignored; returns whether one matched.
pub fn apply_scope(query: &mut SelectQuery, scopable: Option<&dyn Scopable>, scope: &Scope) -> bool {
    let Some(predicate) = scopable.and_then(|s| s.scope(&scope.name, &scope.args)) else {
        return false;
    };
    query.filter(predicate);
    true
}

/// ANDs one predicate per `extraWhere` entry.
///
/// Bare names are qualified with the base table; `table.column` is used as given.
pub fn apply_extra_filters(query: &mut SelectQuery, filters: &BTreeMap<String, FilterValue>) {
    for (field, value) in filters {
        let column = match field.split_once('.') {
            Some((table, name)) => Expr::column(table, name),
            None => Expr::column(query.table(), field.as_str()),
        };
        query.filter(extra_filter(column, value));
    }
}

fn extra_filter(column: Expr, value: &FilterValue) -> Predicate {
    match value {
        FilterValue::Set(values) => Predicate::in_list(column, values.iter().cloned()),
        FilterValue::Scalar(Value::Null) => Predicate::is_null(column),
        FilterValue::Scalar(Value::Text(text))
            if text.starts_with(WILDCARD_MARKER) || text.ends_with(WILDCARD_MARKER) =>
        {
            Predicate::like(column, text.as_str())
        }
        FilterValue::Scalar(value) => Predicate::eq(column, value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    struct Scopes;

    impl Scopable for Scopes {
        fn scope(&self, name: &str, args: &[Value]) -> Option<Predicate> {
            match name {
                "test" => Some(Predicate::eq(Expr::column("users", "id"), Value::from(1))),
                "byEmail" => Some(Predicate::eq(
                    Expr::column("users", "email"),
                    args.first().cloned().unwrap_or_default(),
                )),
                _ => None,
            }
        }
    }

    fn rendered(query: &SelectQuery) -> String {
        query.select_sql(Dialect::SQLite, None).sql(Dialect::SQLite)
    }

    #[test]
    fn scope_with_arguments() {
        let mut query = SelectQuery::new("users");
        let scope = Scope {
            name: "byEmail".into(),
            args: vec![Value::from("a@b.c")],
        };
        assert!(apply_scope(&mut query, Some(&Scopes), &scope));
        assert_eq!(rendered(&query), r#"SELECT * FROM "users" WHERE "users"."email" = ?"#);
    }

    #[test]
    fn unknown_scope_is_ignored() {
        let mut query = SelectQuery::new("users");
        let scope = Scope {
            name: "stale".into(),
            args: Vec::new(),
        };
        assert!(!apply_scope(&mut query, Some(&Scopes), &scope));
        assert!(!apply_scope(&mut query, None, &scope));
        assert!(query.filters().is_empty());
    }

    #[test]
    fn extra_filters_by_shape() {
        let mut filters = BTreeMap::new();
        filters.insert("id".to_owned(), FilterValue::Set(vec![Value::from(1), Value::from(2)]));
        filters.insert("name".to_owned(), FilterValue::Scalar(Value::from("Geo%")));
        filters.insert("countries.name".to_owned(), FilterValue::Scalar(Value::from("Greece")));
        filters.insert("deleted_at".to_owned(), FilterValue::Scalar(Value::Null));

        let mut query = SelectQuery::new("users");
        apply_extra_filters(&mut query, &filters);
        assert_eq!(
            rendered(&query),
            r#"SELECT * FROM "users" WHERE ("countries"."name" = ? AND "users"."deleted_at" IS NULL AND "users"."id" IN (?, ?) AND "users"."name" LIKE ?)"#
        );
    }
}
