//! Compiler configuration
//!
//! Loaded from `datatables.toml`; every key is optional.
//!
//! ```toml
//! [filters]
//! date_format = "%d/%m/%Y"
//! date_display_format = "%d/%m/%Y"
//! date_delimiter = "-dateDelimiter-"
//! null_delimiter = "-nullDelimiter-"
//! date_columns = ["founded_at"]
//! ```

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "datatables.toml";

/// Wraps a per-column value that must match exactly: `|value|`
pub const EXACT_MATCH_MARKER: char = '|';

/// Marks an extra filter value as a pattern: `%value`, `value%`
pub const WILDCARD_MARKER: char = '%';

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub filters: FilterConfig,
}

/// Value-shape markers and date handling used by the search planner
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// chrono format used to parse date-range bounds and relation date searches
    pub date_format: String,
    /// strftime-style format dates are displayed with
    pub date_display_format: String,
    /// Separates `from` and `to` in a date-range search value
    pub date_delimiter: String,
    /// A search value containing this matches null / missing values
    pub null_delimiter: String,
    /// Relation sub-fields that are searched as dates
    pub date_columns: Vec<CompactString>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".into(),
            date_display_format: "%d/%m/%Y".into(),
            date_delimiter: "-dateDelimiter-".into(),
            null_delimiter: "-nullDelimiter-".into(),
            date_columns: Vec::new(),
        }
    }
}

impl FilterConfig {
    #[inline]
    pub fn is_date_column(&self, name: &str) -> bool {
        self.date_columns.iter().any(|c| c == name)
    }

    pub fn with_date_columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CompactString>,
    {
        self.date_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

impl Config {
    /// Load from the default config file
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.into())
            } else {
                ConfigError::Io(path.into(), e)
            }
        })?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(path.into(), e))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let filters = &self.filters;
        if filters.date_delimiter.is_empty() {
            return Err(ConfigError::InvalidFilters("date_delimiter is empty".into()));
        }
        if filters.null_delimiter.is_empty() {
            return Err(ConfigError::InvalidFilters("null_delimiter is empty".into()));
        }
        if filters.date_delimiter == filters.null_delimiter {
            return Err(ConfigError::InvalidFilters(
                "date_delimiter and null_delimiter must differ".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid filters: {0}")]
    InvalidFilters(String),
}

// ============================================================================
// Tests
// ============================================================================
