//! PostgreSQL storage for the datatables compiler.
//!
//! Uses the blocking `postgres` client; identifiers are double-quoted and
//! parameters numbered `$1, $2, ...`.

#[cfg(feature = "postgres-sync")]
mod storage;
#[cfg(feature = "postgres-sync")]
mod values;

#[cfg(feature = "postgres-sync")]
pub use storage::PostgresStorage;
#[cfg(feature = "postgres-sync")]
pub use values::PgParam;
