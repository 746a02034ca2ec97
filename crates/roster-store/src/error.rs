//! Store error types.

use thiserror::Error;

/// Failure raised by a [`crate::UserStore`] adapter.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A user with this email already exists.
    #[error("email already registered: {email}")]
    Duplicate {
        /// The conflicting email.
        email: String,
    },

    /// The backing store could not be reached or failed mid-operation.
    #[error("store unavailable during {operation}: {reason}")]
    Unavailable {
        /// Store operation that failed (`save`, `find_all`, `connect`).
        operation: &'static str,
        /// Underlying driver message. Never shown to HTTP clients.
        reason: String,
    },

    /// Schema migration failed at startup.
    #[error("migration failed: {0}")]
    Migration(String),
}

impl StoreError {
    /// Shorthand for an [`StoreError::Unavailable`] error.
    pub fn unavailable(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            operation,
            reason: reason.into(),
        }
    }

    /// Whether this error is a uniqueness violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}
