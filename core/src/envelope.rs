use serde::Serialize;

use crate::storage::Record;

/// The response body: `{draw, recordsTotal, recordsFiltered, data}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    /// The request's draw token, unchanged
    pub draw: serde_json::Value,
    /// Rows matching scope and extra filters
    pub records_total: u64,
    /// Rows additionally matching every search
    pub records_filtered: u64,
    pub data: Vec<Record>,
}
