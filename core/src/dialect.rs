//! SQL dialects and the dialect-specific fragments the compiler needs.
//!
//! Everything that differs between backends (placeholders, identifier quoting,
//! case-insensitive matching, date formatting, JSON flattening) lives here, so
//! the planners stay dialect-neutral and the dialect is picked once per request.

use std::borrow::Cow;
use std::fmt::Write;

use serde::Deserialize;

use crate::sql::{SQL, SQLChunk, Token};
use crate::value::Value;

/// SQL dialect for database-specific behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// SQLite - uses `?` positional placeholders
    ///
    /// Compatible with: rusqlite
    #[default]
    #[serde(alias = "turso", alias = "libsql")]
    SQLite,

    /// PostgreSQL - uses `$1, $2, ...` numbered placeholders
    #[serde(alias = "postgres", alias = "pg")]
    PostgreSQL,

    /// MySQL - uses `?` positional placeholders
    MySQL,
}

impl Dialect {
    /// Parse a dialect from a string (case-insensitive)
    ///
    /// Supports various common aliases:
    /// - SQLite: `"sqlite"`, `"turso"`, `"libsql"`
    /// - PostgreSQL: `"postgresql"`, `"postgres"`, `"pg"`
    /// - MySQL: `"mysql"`
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("sqlite")
            || s.eq_ignore_ascii_case("turso")
            || s.eq_ignore_ascii_case("libsql")
        {
            Some(Dialect::SQLite)
        } else if s.eq_ignore_ascii_case("postgresql")
            || s.eq_ignore_ascii_case("postgres")
            || s.eq_ignore_ascii_case("pg")
        {
            Some(Dialect::PostgreSQL)
        } else if s.eq_ignore_ascii_case("mysql") {
            Some(Dialect::MySQL)
        } else {
            None
        }
    }

    /// Renders a placeholder for this dialect with the given 1-based index.
    ///
    /// Returns `Cow::Borrowed("?")` for SQLite/MySQL (zero allocation),
    /// `Cow::Owned` for PostgreSQL numbered placeholders.
    #[inline]
    pub fn render_placeholder(&self, index: usize) -> Cow<'static, str> {
        match self {
            Dialect::PostgreSQL => Cow::Owned(format!("${index}")),
            Dialect::SQLite | Dialect::MySQL => Cow::Borrowed("?"),
        }
    }

    /// The identifier quote character
    #[inline]
    pub const fn quote_char(&self) -> char {
        match self {
            Dialect::MySQL => '`',
            Dialect::SQLite | Dialect::PostgreSQL => '"',
        }
    }

    /// Writes a quoted identifier, doubling any embedded quote character.
    pub fn write_ident(&self, buf: &mut impl Write, name: &str) {
        let quote = self.quote_char();
        let _ = buf.write_char(quote);
        for ch in name.chars() {
            if ch == quote {
                let _ = buf.write_char(quote);
            }
            let _ = buf.write_char(ch);
        }
        let _ = buf.write_char(quote);
    }

    /// Case-insensitive pattern match operator
    #[inline]
    pub const fn like(&self) -> Token {
        match self {
            Dialect::PostgreSQL => Token::ILIKE,
            Dialect::SQLite | Dialect::MySQL => Token::LIKE,
        }
    }

    /// Left operand of a pattern match.
    ///
    /// PostgreSQL has no `ILIKE` for numbers, dates or timestamps, so the
    /// operand is cast to text there.
    pub fn text_of(&self, expr: SQL) -> SQL {
        match self {
            Dialect::SQLite | Dialect::MySQL => expr,
            Dialect::PostgreSQL => SQL::func("CAST", expr.push(Token::AS).push(SQLChunk::raw("TEXT"))),
        }
    }

    /// The calendar date of `column`, comparable against ISO `YYYY-MM-DD` text.
    ///
    /// Values that do not start with a date yield `NULL` on every dialect,
    /// so a date range never matches plain text.
    pub fn date_of(&self, column: SQL) -> SQL {
        match self {
            Dialect::SQLite | Dialect::MySQL => SQL::func("DATE", column),
            Dialect::PostgreSQL => SQL::func(
                "SUBSTRING",
                self.text_of(column)
                    .push(Token::FROM)
                    .push(SQLChunk::raw("'^[0-9]{4}-[0-9]{2}-[0-9]{2}'")),
            ),
        }
    }

    /// `column` rendered with a strftime-style display format.
    ///
    /// The format is bound as a parameter.
    pub fn format_date(&self, column: SQL, format: &str) -> SQL {
        match self {
            Dialect::SQLite => SQL::func(
                "strftime",
                SQL::param(format).push(Token::COMMA).append(column),
            ),
            Dialect::MySQL => SQL::func(
                "DATE_FORMAT",
                column.push(Token::COMMA).append(SQL::param(format)),
            ),
            Dialect::PostgreSQL => SQL::func(
                "TO_CHAR",
                column
                    .push(Token::COMMA)
                    .append(SQL::param(self.translate_date_format(format))),
            ),
        }
    }

    /// Predicate: some value of the JSON document in `column`, lowercased,
    /// matches `pattern`.
    pub fn json_values_like(&self, column: SQL, pattern: Value) -> SQL {
        let lowered_value = |value: SQL| SQL::func("LOWER", value);
        match self {
            Dialect::SQLite => {
                let document = SQL::raw("CASE WHEN")
                    .append(SQL::func("json_valid", column.clone()))
                    .append(SQL::raw("THEN"))
                    .append(column)
                    .append(SQL::raw("END"));
                SQL::token(Token::EXISTS).append(
                    SQL::token(Token::SELECT)
                        .append(SQL::number(1))
                        .push(Token::FROM)
                        .append(SQL::func("json_each", document))
                        .alias("j")
                        .push(Token::WHERE)
                        .append(lowered_value(SQL::column("j", "value")))
                        .push(Token::LIKE)
                        .append(SQL::param(pattern))
                        .parens(),
                )
            }
            Dialect::PostgreSQL => {
                let document = SQL::func("CAST", column.push(Token::AS).push(SQLChunk::raw("JSONB")));
                SQL::token(Token::EXISTS).append(
                    SQL::token(Token::SELECT)
                        .append(SQL::number(1))
                        .push(Token::FROM)
                        .append(SQL::func("jsonb_each_text", document))
                        .alias("j")
                        .push(Token::WHERE)
                        .append(lowered_value(SQL::column("j", "value")))
                        .push(Token::LIKE)
                        .append(SQL::param(pattern))
                        .parens(),
                )
            }
            Dialect::MySQL => lowered_value(SQL::func(
                "JSON_EXTRACT",
                column.push(Token::COMMA).push(SQLChunk::raw("'$.*'")),
            ))
            .push(Token::LIKE)
            .append(SQL::param(pattern)),
        }
    }

    /// Translates a strftime-style date format into this dialect's notation.
    ///
    /// SQLite and MySQL understand `%d %e %m %Y %y` natively; PostgreSQL
    /// `TO_CHAR` uses template patterns instead.
    pub fn translate_date_format(&self, format: &str) -> String {
        match self {
            Dialect::SQLite | Dialect::MySQL => format.to_owned(),
            Dialect::PostgreSQL => {
                let mut out = String::with_capacity(format.len() + 8);
                let mut chars = format.chars();
                while let Some(ch) = chars.next() {
                    if ch != '%' {
                        out.push(ch);
                        continue;
                    }
                    match chars.next() {
                        Some('d') => out.push_str("DD"),
                        Some('e') => out.push_str("FMDD"),
                        Some('m') => out.push_str("MM"),
                        Some('Y') => out.push_str("YYYY"),
                        Some('y') => out.push_str("YY"),
                        Some(other) => {
                            out.push('%');
                            out.push(other);
                        }
                        None => out.push('%'),
                    }
                }
                out
            }
        }
    }
}

impl core::fmt::Display for Dialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Dialect::SQLite => "sqlite",
            Dialect::PostgreSQL => "postgresql",
            Dialect::MySQL => "mysql",
        })
    }
}
