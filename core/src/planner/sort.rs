//! Single-column ordering, direct or through a relation.

use compact_str::{CompactString, format_compact};

use crate::join::Join;
use crate::predicate::{Expr, Predicate, Subquery};
use crate::query::SelectQuery;
use crate::relation::{Related, RelationDescriptor, SearchField};
use crate::schema::OrderBy;

use super::{Field, PlanContext, related_rows};

/// Orders `query` by the logical `field`. Unknown fields and polymorphic
/// relations leave the query untouched; returns whether an ordering was added.
pub fn apply(query: &mut SelectQuery, ctx: &PlanContext<'_>, field: &str, direction: OrderBy) -> bool {
    match ctx.resolve(field) {
        None => false,
        Some(Field::Column(column)) => {
            query.order_by(ctx.column(&column.name), direction);
            true
        }
        Some(Field::Relation(relation)) => by_relation(query, ctx, field, relation, direction),
    }
}

fn by_relation(
    query: &mut SelectQuery,
    ctx: &PlanContext<'_>,
    field: &str,
    relation: &RelationDescriptor,
    direction: OrderBy,
) -> bool {
    let base = ctx.table.name();
    match relation {
        // A 1:1 join cannot multiply rows
        RelationDescriptor::BelongsTo(related) | RelationDescriptor::HasOne(related) => {
            query
                .join(join_related(base, related, field))
                .select_base_columns();
            order_by_fields(query, field, related, direction);
        }
        // Ordered by the first related value in sort direction, one row per base row
        RelationDescriptor::BelongsToMany { related, .. } => {
            let alias = query.next_alias();
            let Some(rows) = related_rows(query, base, relation, alias.clone(), Predicate::any([])) else {
                return false;
            };
            for sub_field in &related.fields {
                match sub_field {
                    SearchField::Column(name) => {
                        let value = extremum(direction, rows.clone(), Expr::column(alias.clone(), name.clone()));
                        query.order_by(value, direction);
                    }
                    SearchField::Nested { through, leaf } => {
                        let Some(through) = through.related() else {
                            continue;
                        };
                        let through_alias = format_compact!("{alias}__{}", through.table);
                        let rows = rows.clone().join(
                            through.table.clone(),
                            through_alias.clone(),
                            Predicate::eq(
                                Expr::column(through_alias.clone(), through.foreign_key.clone()),
                                Expr::column(alias.clone(), through.local_key.clone()),
                            ),
                        );
                        for name in leaf.columns() {
                            let value =
                                extremum(direction, rows.clone(), Expr::column(through_alias.clone(), name.clone()));
                            query.order_by(value, direction);
                        }
                    }
                }
            }
        }
        RelationDescriptor::HasMany(related) => {
            let alias = query.next_alias();
            let related_rows = Subquery::new(related.table.clone(), alias.clone()).filter(Predicate::eq(
                Expr::column(alias, related.foreign_key.clone()),
                Expr::column(base, related.local_key.clone()),
            ));
            query.order_by(Expr::count(related_rows), direction);
        }
        RelationDescriptor::MorphTo(_) => return false,
    }
    true
}

/// `MIN` for ascending order, `MAX` for descending
fn extremum(direction: OrderBy, rows: Subquery, value: Expr) -> Expr {
    match direction {
        OrderBy::Asc => Expr::min(rows, value),
        OrderBy::Desc => Expr::max(rows, value),
    }
}

/// `LEFT JOIN related AS alias ON alias.foreign_key = parent.local_key`
fn join_related(parent: &str, related: &Related, alias: &str) -> Join {
    Join::left(
        related.table.clone(),
        alias,
        Predicate::eq(
            Expr::column(alias, related.foreign_key.clone()),
            Expr::column(parent, related.local_key.clone()),
        ),
    )
}

fn order_by_fields(query: &mut SelectQuery, alias: &str, related: &Related, direction: OrderBy) {
    for sub_field in &related.fields {
        match sub_field {
            SearchField::Column(name) => {
                query.order_by(Expr::column(alias, name.clone()), direction);
            }
            SearchField::Nested { through, leaf } => {
                // Only keyed relations can be joined
                let Some(through) = through.related() else {
                    continue;
                };
                let through_alias: CompactString = format_compact!("{alias}__{}", through.table);
                query.join(join_related(alias, through, &through_alias));
                for name in leaf.columns() {
                    query.order_by(Expr::column(through_alias.clone(), name.clone()), direction);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::dialect::Dialect;

    fn sorted(field: &str, direction: OrderBy) -> (bool, String) {
        let table = fixtures::users();
        let catalog = fixtures::catalog();
        let filters = fixtures::filters();
        let ctx = PlanContext::new(&table, &catalog, &filters);
        let mut query = SelectQuery::new("users");
        let applied = apply(&mut query, &ctx, field, direction);
        (applied, query.select_sql(Dialect::SQLite, None).sql(Dialect::SQLite))
    }

    #[test]
    fn direct_column() {
        assert_eq!(
            sorted("created_at", OrderBy::Asc),
            (true, r#"SELECT * FROM "users" ORDER BY "users"."created_at" ASC"#.to_owned())
        );
    }

    #[test]
    fn unknown_field_is_ignored() {
        assert_eq!(sorted("nope", OrderBy::Asc), (false, r#"SELECT * FROM "users""#.to_owned()));
    }

    #[test]
    fn belongs_to_joins_and_selects_base_columns() {
        let (_, sql) = sorted("country", OrderBy::Desc);
        assert_eq!(
            sql,
            r#"SELECT "users".* FROM "users" LEFT JOIN "countries" AS "country" ON "country"."id" = "users"."country_id" ORDER BY "country"."name" DESC, "country"."founded_at" DESC"#
        );
    }

    #[test]
    fn nested_through_relation_adds_a_second_join() {
        let (_, sql) = sorted("countryContinent", OrderBy::Asc);
        assert_eq!(
            sql,
            r#"SELECT "users".* FROM "users" LEFT JOIN "countries" AS "countryContinent" ON "countryContinent"."id" = "users"."country_id" LEFT JOIN "continents" AS "countryContinent__continents" ON "countryContinent__continents"."id" = "countryContinent"."continent_id" ORDER BY "countryContinent__continents"."name" ASC"#
        );
    }

    #[test]
    fn has_many_orders_by_related_count() {
        let (_, sql) = sorted("userLogins", OrderBy::Desc);
        assert_eq!(
            sql,
            r#"SELECT * FROM "users" ORDER BY (SELECT COUNT(*) FROM "user_logins" AS "r0" WHERE "r0"."user_id" = "users"."id") DESC"#
        );
    }

    #[test]
    fn self_referencing_has_one() {
        let (_, sql) = sorted("userNameAndEmail", OrderBy::Asc);
        assert_eq!(
            sql,
            r#"SELECT "users".* FROM "users" LEFT JOIN "users" AS "userNameAndEmail" ON "userNameAndEmail"."id" = "users"."id" ORDER BY "userNameAndEmail"."name" ASC, "userNameAndEmail"."email" ASC"#
        );
    }

    #[test]
    fn belongs_to_many_orders_by_first_related_value() {
        let (_, sql) = sorted("roles", OrderBy::Asc);
        assert_eq!(
            sql,
            r#"SELECT * FROM "users" ORDER BY (SELECT MIN("r0"."title") FROM "roles" AS "r0" INNER JOIN "role_user" AS "r1" ON "r1"."role_id" = "r0"."id" WHERE "r1"."user_id" = "users"."id") ASC"#
        );

        let (_, sql) = sorted("roles", OrderBy::Desc);
        assert!(sql.starts_with(r#"SELECT * FROM "users" ORDER BY (SELECT MAX("r0"."title")"#), "{sql}");
        assert!(sql.ends_with(") DESC"), "{sql}");
    }
}
