//! Data error types.

use thiserror::Error;

/// Panel loading and lookup errors.
#[derive(Debug, Error)]
pub enum DataError {
    /// Reading the source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(String),

    /// A configured key column is absent from the header
    #[error("Missing column '{0}'")]
    MissingColumn(String),

    /// The requested metric is not part of the panel
    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),

    /// A key field could not be parsed
    #[error("Parse error on line {line}: {message}")]
    Parse { line: u64, message: String },
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
