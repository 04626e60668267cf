use std::borrow::Cow;
use std::fmt::Write;

use compact_str::CompactString;

use crate::dialect::Dialect;
use crate::sql::Token;
use crate::value::Value;

/// A SQL chunk represents a part of an SQL statement.
///
/// - `Token` - SQL keywords and operators (SELECT, FROM, =, etc.)
/// - `Ident` - Quoted identifiers ("table_name", "column_name")
/// - `Column` - Qualified column reference ("table"."column")
/// - `Raw` - Unquoted raw SQL text (function names)
/// - `Number` - Unsigned integer literal (LIMIT / OFFSET)
/// - `Param` - Bound parameter, rendered as a dialect placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SQLChunk {
    /// SQL keywords and operators: SELECT, FROM, WHERE, =, AND, etc.
    Token(Token),

    /// Quoted identifier for user-provided names.
    /// Renders as: "name", or `name` on MySQL
    Ident(CompactString),

    /// Qualified column reference.
    /// Renders as: "table"."column"
    Column {
        table: CompactString,
        name: CompactString,
    },

    /// Raw SQL text (unquoted). Never built from caller input.
    Raw(Cow<'static, str>),

    /// Unsigned integer literal
    Number(u64),

    /// Parameter value, rendered as ? or $n depending on the dialect
    Param(Value),
}

impl SQLChunk {
    /// Creates a quoted identifier
    #[inline]
    pub fn ident(name: impl Into<CompactString>) -> Self {
        Self::Ident(name.into())
    }

    /// Creates raw SQL text
    #[inline]
    pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
        Self::Raw(text.into())
    }

    /// Write chunk content to buffer. Parameters are handled by the caller,
    /// which owns the placeholder numbering.
    pub(crate) fn write(&self, buf: &mut impl Write, dialect: Dialect) {
        match self {
            SQLChunk::Token(token) => {
                let _ = buf.write_str(token.as_str());
            }
            SQLChunk::Ident(name) => dialect.write_ident(buf, name),
            SQLChunk::Column { table, name } => {
                dialect.write_ident(buf, table);
                let _ = buf.write_char('.');
                dialect.write_ident(buf, name);
            }
            SQLChunk::Raw(text) => {
                let _ = buf.write_str(text);
            }
            SQLChunk::Number(n) => {
                let _ = write!(buf, "{n}");
            }
            SQLChunk::Param(_) => {
                let _ = buf.write_char('?');
            }
        }
    }

    /// Check if this chunk is "word-like" (needs space separation from other word-like chunks)
    #[inline]
    pub(crate) const fn is_word_like(&self) -> bool {
        match self {
            SQLChunk::Token(t) => !matches!(
                t,
                Token::LPAREN
                    | Token::RPAREN
                    | Token::COMMA
                    | Token::DOT
                    | Token::EQ
                    | Token::NE
                    | Token::LT
                    | Token::GT
                    | Token::LE
                    | Token::GE
            ),
            SQLChunk::Ident(_)
            | SQLChunk::Column { .. }
            | SQLChunk::Raw(_)
            | SQLChunk::Number(_)
            | SQLChunk::Param(_) => true,
        }
    }
}

// ==================== From implementations ====================

impl From<Token> for SQLChunk {
    #[inline]
    fn from(value: Token) -> Self {
        Self::Token(value)
    }
}

impl From<Value> for SQLChunk {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Param(value)
    }
}
