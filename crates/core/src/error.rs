//! Domain error model.

use thiserror::Error;

use crate::validation::FieldError;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Covers input that was rejected before touching persistence: field
/// validation, exact date/time parsing, identifiers and paging parameters.
/// Storage failures live in the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more fields failed the declarative checks.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// A calendar date had the right shape but is not a real `YYYY-MM-DD` day.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A timestamp had the right shape but is not valid RFC 3339.
    #[error("invalid datetime: {0}")]
    InvalidDateTime(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    #[error("invalid offset: {0}")]
    InvalidOffset(String),
}

impl DomainError {
    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self::Validation(fields)
    }

    pub fn invalid_date(msg: impl Into<String>) -> Self {
        Self::InvalidDate(msg.into())
    }

    pub fn invalid_datetime(msg: impl Into<String>) -> Self {
        Self::InvalidDateTime(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_limit(msg: impl Into<String>) -> Self {
        Self::InvalidLimit(msg.into())
    }

    pub fn invalid_offset(msg: impl Into<String>) -> Self {
        Self::InvalidOffset(msg.into())
    }

    /// Field-level errors, empty for every kind except `Validation`.
    pub fn fields(&self) -> &[FieldError] {
        match self {
            Self::Validation(fields) => fields,
            _ => &[],
        }
    }
}
