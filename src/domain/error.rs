//! Validation errors
//!
//! Malformed input rejected before it reaches the data-access layer.

use thiserror::Error;

use super::AmountError;

/// Input that fails domain validation. Always a client error and never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid type '{0}': expected income or expense")]
    InvalidEntryType(String),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid description: {0}")]
    InvalidDescription(String),

    #[error("Invalid date range: 'from' is after 'to'")]
    InvalidDateRange,
}
