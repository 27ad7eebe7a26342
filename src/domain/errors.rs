//! Domain errors for the persistence layer.
//!
//! Only write paths surface these to callers; read operations catch them at
//! the repository boundary, log, and degrade to empty results.

use thiserror::Error;

/// Errors raised by the backing store and hydration.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    #[error("UUID parse error: {0}")]
    UuidParseError(#[from] uuid::Error),

    #[error("DateTime parse error: {0}")]
    DateTimeParseError(#[from] chrono::ParseError),

    #[error("Unknown {field} value in stored row: {value}")]
    UnknownEnumValue { field: &'static str, value: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
