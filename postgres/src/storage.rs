use datatables_core::error::{DatatablesError, Result};
use datatables_core::{Dialect, Row, SQL, Storage, datatables_trace_query};
use postgres::Client;
use postgres::types::ToSql;

use crate::values::{PgParam, from_column};

/// [`Storage`] over a borrowed synchronous postgres [`Client`]
pub struct PostgresStorage<'c> {
    client: &'c mut Client,
}

impl<'c> PostgresStorage<'c> {
    pub fn new(client: &'c mut Client) -> Self {
        Self { client }
    }
}

/// The server's own message when there is one; `postgres::Error` alone only says "db error"
pub(crate) fn storage_error(e: postgres::Error) -> DatatablesError {
    match e.as_db_error() {
        Some(db) => DatatablesError::Storage(format!(
            "{}: {} (SQLSTATE {})",
            db.severity(),
            db.message(),
            db.code().code()
        )),
        None => DatatablesError::Storage(e.to_string()),
    }
}

impl Storage for PostgresStorage<'_> {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSQL
    }

    fn count(&mut self, sql: &SQL) -> Result<u64> {
        let (sql_str, params) = sql.build(Dialect::PostgreSQL);
        datatables_trace_query!(&sql_str, params.len());

        let params: Vec<PgParam<'_>> = params.iter().copied().map(PgParam).collect();
        let refs: Vec<&(dyn ToSql + Sync)> = params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        let row = self.client.query_one(sql_str.as_str(), &refs).map_err(storage_error)?;
        let count: i64 = row.try_get(0).map_err(storage_error)?;
        u64::try_from(count).map_err(|_| DatatablesError::Storage(format!("negative count {count}")))
    }

    fn fetch(&mut self, sql: &SQL) -> Result<Vec<Row>> {
        let (sql_str, params) = sql.build(Dialect::PostgreSQL);
        datatables_trace_query!(&sql_str, params.len());

        let params: Vec<PgParam<'_>> = params.iter().copied().map(PgParam).collect();
        let refs: Vec<&(dyn ToSql + Sync)> = params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        self.client
            .query(sql_str.as_str(), &refs)
            .map_err(storage_error)?
            .iter()
            .map(|row| {
                let mut values = Row::with_capacity(row.len());
                for (idx, column) in row.columns().iter().enumerate() {
                    values.push(column.name(), from_column(row, idx)?);
                }
                Ok(values)
            })
            .collect()
    }
}
