//! Error types for adrecon-core

use thiserror::Error;

/// Core error type for adrecon
#[derive(Error, Debug)]
pub enum CoreError {
    /// R001: Configuration file not found
    #[error("[R001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// R002: Invalid configuration value
    #[error("[R002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// R003: A required column is missing from an input relation
    #[error("[R003] Schema error: dataset '{dataset}' is missing required column '{column}'")]
    Schema { dataset: String, column: String },

    /// R004: A numeric cell could not be cast to a non-negative integer
    #[error("[R004] Parse error: dataset '{dataset}', column '{column}', row {row}: cannot parse {value:?} as a non-negative integer")]
    Parse {
        dataset: String,
        column: String,
        row: usize,
        value: String,
    },

    /// R005: Invalid namespace for dataset tables
    #[error("[R005] Invalid namespace '{namespace}': {reason}")]
    InvalidNamespace { namespace: String, reason: String },

    /// R006: IO error with file path context
    #[error("[R006] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// R007: Config YAML parse error
    #[error("[R007] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// R008: A summed or subtracted count left the 64-bit range
    #[error("[R008] Count overflow: {what} does not fit in a 64-bit integer")]
    Overflow { what: String },
}

impl CoreError {
    /// Overflow error for the named quantity.
    pub fn overflow(what: impl Into<String>) -> Self {
        CoreError::Overflow { what: what.into() }
    }

    /// Whether this error comes from the input data (schema, parse or
    /// overflow) as opposed to a configuration/IO failure.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            CoreError::Schema { .. } | CoreError::Parse { .. } | CoreError::Overflow { .. }
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
