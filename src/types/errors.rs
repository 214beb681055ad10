use std::time::Duration;

use thiserror::Error;

// === StoreError ===

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database call failed.
    #[error("Store database error: {0}")]
    Database(String),
    /// A row addressed by id does not exist.
    #[error("Store record not found: {0}")]
    NotFound(String),
    /// A uniqueness or foreign-key constraint rejected the write.
    #[error("Store constraint violated: {0}")]
    Constraint(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(ref err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(e.to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

// === EngineError ===

/// Errors surfaced by the import and retrieval engines.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A collection with the same name or slug already exists.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The target does not exist, or the caller may not see it.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The request is malformed.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The operation needs an authenticated session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// A store call failed; the caller may retry.
    #[error("Transient failure: {0}")]
    Transient(#[from] StoreError),
    /// The import did not finish within its wall-clock budget.
    #[error("Import timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl EngineError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
