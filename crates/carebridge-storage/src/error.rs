//! Storage error types

use thiserror::Error;

/// Failure of a storage operation
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A referenced row does not exist
    #[error("referential integrity violation: {constraint}")]
    ForeignKey { constraint: String },

    /// A uniqueness or restrict constraint refused the operation
    #[error("conflict: {0}")]
    Conflict(String),

    /// Password hashing failed
    #[error("password hashing failed: {0}")]
    Password(String),

    /// A stored value could not be interpreted
    #[error("invalid stored value: {0}")]
    Decode(String),

    /// Driver, pool, or connectivity failure
    #[error("database error: {0}")]
    Database(String),
}

impl StorageError {
    /// Referential-integrity failure on the named constraint
    pub fn foreign_key(constraint: impl Into<String>) -> Self {
        Self::ForeignKey {
            constraint: constraint.into(),
        }
    }

    /// Conflict with existing state
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
