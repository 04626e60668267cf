//! The inbound table request.
//!
//! Mirrors the payload a DataTables client posts; numbers may arrive as
//! strings and most keys may be missing.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::error::{DatatablesError, Result};
use crate::schema::OrderBy;
use crate::value::Value;

/// Requested page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Length {
    /// `-1` or absent: every row
    #[default]
    All,
    Rows(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchSpec {
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    /// Logical field name; `None` for unbound columns
    #[serde(deserialize_with = "lenient_field")]
    pub data: Option<String>,
    pub search: SearchSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrderSpec {
    /// Index into `columns`; `None` when sent empty
    #[serde(deserialize_with = "lenient_index")]
    pub column: Option<usize>,
    #[serde(deserialize_with = "direction")]
    pub dir: OrderBy,
}

/// A named scope and its positional arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub name: String,
    pub args: Vec<Value>,
}

/// Value of an `extraWhere` entry
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// `field IN (...)`
    Set(Vec<Value>),
    /// `field = value`, or `LIKE` when wrapped in the wildcard marker
    Scalar(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestSpec {
    /// Opaque correlation token, echoed back as is
    pub draw: serde_json::Value,
    #[serde(deserialize_with = "lenient_start")]
    pub start: u64,
    #[serde(deserialize_with = "lenient_length")]
    pub length: Length,
    pub search: SearchSpec,
    pub columns: Vec<ColumnSpec>,
    pub order: Vec<OrderSpec>,
    #[serde(deserialize_with = "scope")]
    pub scope: Option<Scope>,
    pub extra_where: BTreeMap<String, FilterValue>,
}

impl RequestSpec {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| DatatablesError::InvalidRequest(e.to_string()))
    }

    pub fn from_value(body: serde_json::Value) -> Result<Self> {
        serde_json::from_value(body).map_err(|e| DatatablesError::InvalidRequest(e.to_string()))
    }

    /// The first order entry, if it names a column
    pub fn sort(&self) -> Option<(usize, OrderBy)> {
        let first = self.order.first()?;
        Some((first.column?, first.dir))
    }

    /// Field name of the column at `index`, if bound and non-empty
    pub fn field(&self, index: usize) -> Option<&str> {
        self.columns
            .get(index)
            .and_then(|c| c.data.as_deref())
            .filter(|name| !name.is_empty())
    }
}

// ============================================================================
// Lenient decoding
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Str(String),
    Null(()),
}

impl Lenient {
    fn into_i64<E: de::Error>(self) -> std::result::Result<Option<i64>, E> {
        match self {
            Lenient::Int(n) => Ok(Some(n)),
            Lenient::Float(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
            Lenient::Float(f) => Err(E::custom(format!("expected an integer, got {f}"))),
            Lenient::Str(s) if s.trim().is_empty() => Ok(None),
            Lenient::Str(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("expected an integer, got `{s}`"))),
            Lenient::Null(()) => Ok(None),
        }
    }
}

fn lenient_start<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    match Lenient::deserialize(d)?.into_i64()? {
        Some(n) if n < 0 => Err(de::Error::custom(format!("start must not be negative, got {n}"))),
        Some(n) => Ok(n as u64),
        None => Ok(0),
    }
}

fn lenient_length<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Length, D::Error> {
    Ok(match Lenient::deserialize(d)?.into_i64()? {
        Some(n) if n >= 0 => Length::Rows(n as u64),
        _ => Length::All,
    })
}

fn lenient_index<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<usize>, D::Error> {
    match Lenient::deserialize(d)?.into_i64()? {
        Some(n) if n < 0 => Err(de::Error::custom(format!("column index must not be negative, got {n}"))),
        Some(n) => Ok(Some(n as usize)),
        None => Ok(None),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(match Lenient::deserialize(d)? {
        Lenient::Int(n) => n.to_string(),
        Lenient::Float(f) => f.to_string(),
        Lenient::Str(s) => s,
        Lenient::Null(()) => String::new(),
    })
}

fn lenient_field<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    let name = lenient_string(d)?;
    Ok((!name.is_empty()).then_some(name))
}

fn direction<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<OrderBy, D::Error> {
    let dir = Option::<String>::deserialize(d)?;
    match dir.as_deref() {
        None | Some("") => Ok(OrderBy::Asc),
        Some(s) => OrderBy::parse(s)
            .ok_or_else(|| de::Error::custom(format!("unknown sort direction `{s}`"))),
    }
}

fn scope<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<Scope>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Name(String),
        Call(Vec<serde_json::Value>),
        Null(()),
    }

    Ok(match Raw::deserialize(d)? {
        Raw::Name(name) if !name.is_empty() => Some(Scope {
            name,
            args: Vec::new(),
        }),
        Raw::Call(call) => {
            let mut call = call.into_iter();
            match call.next() {
                Some(serde_json::Value::String(name)) if !name.is_empty() => Some(Scope {
                    name,
                    args: call.map(Value::from).collect(),
                }),
                Some(serde_json::Value::String(_) | serde_json::Value::Null) | None => None,
                Some(other) => {
                    return Err(de::Error::custom(format!("scope name must be a string, got {other}")));
                }
            }
        }
        _ => None,
    })
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        Ok(match serde_json::Value::deserialize(d)? {
            serde_json::Value::Array(items) => {
                FilterValue::Set(items.into_iter().map(Value::from).collect())
            }
            scalar => FilterValue::Scalar(Value::from(scalar)),
        })
    }
}
