//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// Uniqueness constraint violated.
    ///
    /// Surfaced separately so insert call sites can translate the
    /// violated constraint into the matching domain conflict instead of
    /// a generic failure.
    #[error("unique constraint violated: {}", constraint.as_deref().unwrap_or("<unnamed>"))]
    UniqueViolation { constraint: Option<String> },

    /// Record not found
    #[error("record not found")]
    NotFound,
}

impl DbError {
    /// Name of the violated uniqueness constraint, if this is one
    pub fn unique_constraint(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { constraint } => constraint.as_deref(),
            _ => None,
        }
    }

    /// Whether this is a uniqueness-constraint violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Self::UniqueViolation {
                    constraint: db_err.constraint().map(String::from),
                };
            }
        }
        Self::Sqlx(err)
    }
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
