use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DatatablesError {
    /// The entity does not provide a capability the request needs
    #[error("Missing capability: {capability} is not provided by `{entity}`")]
    MissingCapability {
        entity: String,
        capability: &'static str,
    },

    /// A date in a range or relation search did not match the configured input format
    #[error("Date parse error: `{value}` does not match `{format}`: {source}")]
    DateParse {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The inbound request could not be decoded
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Error mapping a fetched row to its output record
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Error reported by the storage layer, passed through unmodified
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, DatatablesError>;
