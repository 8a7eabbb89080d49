//! Centralized error types for famdoc.

use famdoc_db::DbError;
use thiserror::Error;

/// Main error type for famdoc operations.
#[derive(Error, Debug)]
pub enum DocError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown user id: {0}")]
    UnknownUser(String),

    #[error("Database error: {0}")]
    Database(DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for famdoc operations.
pub type DocResult<T> = Result<T, DocError>;

impl DocError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an access error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}

impl From<DbError> for DocError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => Self::NotFound(what),
            other => Self::Database(other),
        }
    }
}
