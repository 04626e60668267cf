//! Conversions between [`Value`] and postgres wire types.
//!
//! The server infers a type for every `$n` from its context, so parameters
//! are encoded by that type rather than by the variant they arrived as.

use std::error::Error;

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use datatables_core::error::{DatatablesError, Result};
use datatables_core::Value;
use postgres::types::{FromSqlOwned, IsNull, ToSql, Type};

type BoxError = Box<dyn Error + Sync + Send>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Borrowing adapter binding a [`Value`] as a postgres parameter
#[derive(Debug, Clone, Copy)]
pub struct PgParam<'a>(pub &'a Value);

impl ToSql for PgParam<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
        match self.0 {
            Value::Null => Ok(IsNull::Yes),
            Value::Integer(i) => integer_to_sql(*i, ty, out),
            Value::Real(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::UNKNOWN => f.to_string().to_sql(ty, out),
                _ => f.to_sql(ty, out),
            },
            Value::Text(s) => text_to_sql(s, ty, out),
            Value::Blob(b) => b.as_slice().to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    postgres::types::to_sql_checked!();
}

fn integer_to_sql(i: i64, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    match *ty {
        Type::BOOL => (i != 0).to_sql(ty, out),
        Type::INT2 => i16::try_from(i)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(i)?.to_sql(ty, out),
        Type::FLOAT4 => (i as f32).to_sql(ty, out),
        Type::FLOAT8 => (i as f64).to_sql(ty, out),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::UNKNOWN => i.to_string().to_sql(ty, out),
        _ => i.to_sql(ty, out),
    }
}

fn text_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 | Type::INT4 | Type::INT8 | Type::BOOL => integer_to_sql(s.trim().parse()?, ty, out),
        Type::FLOAT4 | Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)
            .unwrap_or_else(|_| serde_json::Value::String(s.to_owned()))
            .to_sql(ty, out),
        Type::DATE => NaiveDate::parse_from_str(s, "%Y-%m-%d")?.to_sql(ty, out),
        Type::TIMESTAMP => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)?.to_sql(ty, out),
        Type::TIMESTAMPTZ => DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc).to_sql(ty, out),
        _ => s.to_sql(ty, out),
    }
}

fn cell<T: FromSqlOwned>(row: &postgres::Row, idx: usize) -> Result<Option<T>> {
    row.try_get(idx).map_err(|e| {
        DatatablesError::Mapping(format!("column {}: {e}", row.columns()[idx].name()))
    })
}

/// Decodes one cell by its declared column type
pub(crate) fn from_column(row: &postgres::Row, idx: usize) -> Result<Value> {
    let column = &row.columns()[idx];
    let value = match *column.type_() {
        Type::BOOL => cell::<bool>(row, idx)?.map(|b| Value::Integer(b.into())),
        Type::INT2 => cell::<i16>(row, idx)?.map(|i| Value::Integer(i.into())),
        Type::INT4 => cell::<i32>(row, idx)?.map(Value::from),
        Type::INT8 => cell::<i64>(row, idx)?.map(Value::from),
        Type::FLOAT4 => cell::<f32>(row, idx)?.map(|f| Value::Real(f.into())),
        Type::FLOAT8 => cell::<f64>(row, idx)?.map(Value::Real),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => cell::<String>(row, idx)?.map(Value::Text),
        Type::JSON | Type::JSONB => cell::<serde_json::Value>(row, idx)?.map(|json| Value::Text(json.to_string())),
        Type::DATE => cell::<NaiveDate>(row, idx)?.map(|date| Value::Text(date.format("%Y-%m-%d").to_string())),
        Type::TIMESTAMP => {
            cell::<NaiveDateTime>(row, idx)?.map(|ts| Value::Text(ts.format(TIMESTAMP_FORMAT).to_string()))
        }
        Type::TIMESTAMPTZ => cell::<DateTime<Utc>>(row, idx)?.map(|ts| Value::Text(ts.to_rfc3339())),
        Type::BYTEA => cell::<Vec<u8>>(row, idx)?.map(Value::Blob),
        ref other => {
            return Err(DatatablesError::Mapping(format!(
                "column {}: unsupported type {other}",
                column.name()
            )));
        }
    };
    Ok(value.unwrap_or(Value::Null))
}
