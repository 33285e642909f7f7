//! Domain error model.

use thiserror::Error;

/// Result alias for ledger rule checks.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failures decided by ledger rules alone.
///
/// Identity and storage failures have their own types in `moneta-auth` and
/// `moneta-infra`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or a supplied value is malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A query filter value could not be interpreted.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// The targeted entry does not exist (for this owner).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }
}
