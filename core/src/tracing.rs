//! Tracing utilities for query and compiler-stage observability.
//!
//! Enable the `tracing` feature to emit spans and events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// datatables_trace_query!(&sql_str, params.len());
/// ```
#[macro_export]
macro_rules! datatables_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "datatables.query");
    };
}

/// Emit a debug-level tracing event when the compiler enters a stage.
///
/// ```ignore
/// datatables_trace_stage!("sorted", "users");
/// ```
#[macro_export]
macro_rules! datatables_trace_stage {
    ($stage:literal, $table:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(stage = $stage, table = %$table, "datatables.stage");
    };
}
