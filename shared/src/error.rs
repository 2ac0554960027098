//! Error types for the front-of-house engine
//!
//! Business-rule violations are typed and recovered locally by the caller.
//! Only [`DomainError::Storage`] represents an infrastructure failure and is
//! propagated as-is.

use thiserror::Error;

/// Primary error type for the engine crates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Table / order / item / reservation missing
    #[error("{0} not found")]
    NotFound(String),

    /// Table occupied, target table not free, duplicate table number, ...
    #[error("conflict: {0}")]
    Conflict(String),

    /// Illegal status value, discount out of range, non-positive amount, ...
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Role-restricted mutation attempted by a disallowed role
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Data-integrity violation (e.g. order chain cycle / depth exceeded)
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Storage layer failure (transaction could not complete)
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    // ==================== Convenience constructors ====================

    /// Create a not found error for a named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Create an integrity error
    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether this error is a business-rule violation (recoverable by the
    /// caller) rather than an infrastructure failure.
    pub fn is_business(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Result alias used throughout the engine
pub type DomainResult<T> = Result<T, DomainError>;
