//! The storage layer the compiler executes against.

use compact_str::CompactString;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::sql::SQL;
use crate::value::Value;

/// Output record of one projected row
pub type Record = serde_json::Map<String, serde_json::Value>;

/// One fetched row: column names and values in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(CompactString, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<CompactString>, value: Value) {
        self.columns.push((name.into(), value));
    }

    /// Value of the first column called `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Every column as a JSON record; later duplicates win
    pub fn to_record(&self) -> Record {
        self.iter()
            .map(|(name, value)| (name.to_owned(), value.to_json()))
            .collect()
    }
}

impl FromIterator<(CompactString, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (CompactString, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// Blocking access to the database a request is compiled for.
///
/// Implementations execute what they are given and report failures as
/// [`DatatablesError::Storage`](crate::error::DatatablesError::Storage);
/// they never retry.
pub trait Storage {
    /// Dialect the SQL is rendered in
    fn dialect(&self) -> Dialect;

    /// Runs a `SELECT COUNT(*) ...` and returns the single value
    fn count(&mut self, sql: &SQL) -> Result<u64>;

    /// Runs a select and returns every row
    fn fetch(&mut self, sql: &SQL) -> Result<Vec<Row>>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn count(&mut self, sql: &SQL) -> Result<u64> {
        (**self).count(sql)
    }

    fn fetch(&mut self, sql: &SQL) -> Result<Vec<Row>> {
        (**self).fetch(sql)
    }
}
