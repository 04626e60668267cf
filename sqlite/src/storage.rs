use compact_str::CompactString;
use datatables_core::error::{DatatablesError, Result};
use datatables_core::{Dialect, Row, SQL, Storage, datatables_trace_query};
use rusqlite::{Connection, params_from_iter};

use crate::values::{SqliteParam, from_value_ref};

/// [`Storage`] over a borrowed rusqlite [`Connection`]
#[derive(Debug, Clone, Copy)]
pub struct SqliteStorage<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStorage<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    #[inline]
    pub fn connection(&self) -> &'c Connection {
        self.conn
    }
}

pub(crate) fn storage_error(e: rusqlite::Error) -> DatatablesError {
    DatatablesError::Storage(e.to_string())
}

impl Storage for SqliteStorage<'_> {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn count(&mut self, sql: &SQL) -> Result<u64> {
        let (sql_str, params) = sql.build(Dialect::SQLite);
        datatables_trace_query!(&sql_str, params.len());

        let mut stmt = self.conn.prepare(&sql_str).map_err(storage_error)?;
        let count: i64 = stmt
            .query_row(params_from_iter(params.iter().copied().map(SqliteParam)), |row| row.get(0))
            .map_err(storage_error)?;

        u64::try_from(count).map_err(|_| DatatablesError::Storage(format!("negative count {count}")))
    }

    fn fetch(&mut self, sql: &SQL) -> Result<Vec<Row>> {
        let (sql_str, params) = sql.build(Dialect::SQLite);
        datatables_trace_query!(&sql_str, params.len());

        let mut stmt = self.conn.prepare(&sql_str).map_err(storage_error)?;
        let names: Vec<CompactString> = stmt.column_names().into_iter().map(CompactString::from).collect();

        let mut rows = stmt
            .query(params_from_iter(params.iter().copied().map(SqliteParam)))
            .map_err(storage_error)?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().map_err(storage_error)? {
            let mut values = Row::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                let value = row.get_ref(i).map_err(storage_error)?;
                values.push(name.clone(), from_value_ref(value));
            }
            results.push(values);
        }
        Ok(results)
    }
}
