//! # User Entity
//!
//! The single persisted record type of the service. Identity is a
//! store-generated integer wrapped in [`UserId`] so it cannot be confused
//! with other integers flowing through the pipeline.
//!
//! ## Invariants
//!
//! - `id` is assigned by the store and never changes.
//! - `email` is unique across all users. Uniqueness is enforced by the
//!   store (a column constraint), never by a check-then-write in process.
//! - `created_at` and `updated_at` are set by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store-generated identifier of a [`User`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Access the raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// A persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-generated identifier.
    pub id: UserId,
    /// Unique email address.
    pub email: String,
    /// When the record was inserted.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

/// Payload for inserting a new user. Everything else is store-assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Email address to register.
    pub email: String,
}

impl NewUser {
    /// Build an insert payload for the given email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}
