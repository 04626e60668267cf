//! SQLite storage for the datatables compiler.
//!
//! ```no_run
//! # use datatables_sqlite::SqliteStorage;
//! let conn = rusqlite::Connection::open("app.db").unwrap();
//! let storage = SqliteStorage::new(&conn);
//! ```

#[cfg(feature = "rusqlite")]
mod storage;
#[cfg(feature = "rusqlite")]
mod values;

#[cfg(feature = "rusqlite")]
pub use storage::SqliteStorage;
#[cfg(feature = "rusqlite")]
pub use values::SqliteParam;
