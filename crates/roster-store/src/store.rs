//! The `UserStore` contract.

use async_trait::async_trait;
use roster_core::{NewUser, User};

use crate::error::StoreError;

/// Persistence contract for [`User`] records.
///
/// Implementations must be safe to share across concurrently running
/// requests; the HTTP layer holds one instance behind an `Arc`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return the persisted record.
    ///
    /// Must reject, never upsert, when `new.email` is already taken,
    /// returning [`StoreError::Duplicate`].
    async fn save(&self, new: NewUser) -> Result<User, StoreError>;

    /// All users in insertion order. Empty, not an error, when there are none.
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;
}
