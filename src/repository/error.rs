//! Repository errors
//!
//! Unique and foreign-key violations are classified once, here.

use std::fmt;

/// Why an operation conflicts with stored data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A uniqueness invariant would be violated
    Duplicate,
    /// The row is still referenced by a dependent row
    DependentRow,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::Duplicate => f.write_str("duplicate"),
            ConflictKind::DependentRow => f.write_str("dependent_row"),
        }
    }
}

/// A uniqueness or referential conflict, surfaced verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ConflictKind,
    /// Stable machine-readable code, e.g. `category_exists`
    pub code: &'static str,
    /// Actionable message for the client
    pub message: &'static str,
}

impl Conflict {
    pub const fn duplicate(code: &'static str, message: &'static str) -> Self {
        Self {
            kind: ConflictKind::Duplicate,
            code,
            message,
        }
    }

    pub const fn dependent_row(code: &'static str, message: &'static str) -> Self {
        Self {
            kind: ConflictKind::DependentRow,
            code,
            message,
        }
    }
}

/// Data-access errors
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{}", .0.message)]
    Conflict(Conflict),

    /// A weak reference (category_id) names no row owned by the caller
    #[error("Referenced {0} not found")]
    MissingReference(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Constraint violation reported by the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey { constraint: Option<String> },
}

/// Inspect a sqlx error for a unique or foreign-key violation.
pub(crate) fn violation(err: &sqlx::Error) -> Option<Violation> {
    let db_err = err.as_database_error()?;
    if db_err.is_unique_violation() {
        Some(Violation::Unique)
    } else if db_err.is_foreign_key_violation() {
        Some(Violation::ForeignKey {
            constraint: db_err.constraint().map(str::to_string),
        })
    } else {
        None
    }
}

/// Classify an insert/update failure: unique → `duplicate`, FK → missing
/// category reference, anything else stays a database error.
pub(crate) fn classify_write(err: sqlx::Error, duplicate: Conflict) -> RepoError {
    match violation(&err) {
        Some(Violation::Unique) => RepoError::Conflict(duplicate),
        _ => classify_reference(err),
    }
}

/// Classify a write on a table whose only constraint of interest is the
/// category reference.
pub(crate) fn classify_reference(err: sqlx::Error) -> RepoError {
    match violation(&err) {
        Some(Violation::ForeignKey { .. }) => RepoError::MissingReference("category"),
        _ => RepoError::Database(err),
    }
}
