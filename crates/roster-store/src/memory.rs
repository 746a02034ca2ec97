//! # In-Memory User Store
//!
//! Thread-safe, cloneable store used when no `DATABASE_URL` is configured
//! and in tests. State does not survive restarts.
//!
//! The `RwLock` is `parking_lot`, not `tokio::sync`: it is never held
//! across an `.await`, and it does not poison if a writer panics. The
//! uniqueness check and the insert run under the same write guard, so two
//! concurrent registrations of one email cannot both succeed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use roster_core::{NewUser, User, UserId};

use crate::error::StoreError;
use crate::store::UserStore;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<User>,
    last_id: i64,
}

/// In-memory [`UserStore`]. Clones share the same underlying table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, new: NewUser) -> Result<User, StoreError> {
        let mut table = self.table.write();
        if table.rows.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Duplicate { email: new.email });
        }

        table.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: UserId(table.last_id),
            email: new.email,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.table.read().rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = InMemoryUserStore::new();
        assert!(store.find_all().await.unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids_and_timestamps() {
        let store = InMemoryUserStore::new();
        let a = store.save(NewUser::new("a@example.com")).await.unwrap();
        let b = store.save(NewUser::new("b@example.com")).await.unwrap();

        assert_eq!(a.id, UserId(1));
        assert_eq!(b.id, UserId(2));
        assert_eq!(a.created_at, a.updated_at);
        assert!(b.created_at >= a.created_at);
    }

    #[tokio::test]
    async fn find_all_preserves_insertion_order() {
        let store = InMemoryUserStore::new();
        for email in ["c@example.com", "a@example.com", "b@example.com"] {
            store.save(NewUser::new(email)).await.unwrap();
        }
        let emails: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, ["c@example.com", "a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_not_upserted() {
        let store = InMemoryUserStore::new();
        let first = store.save(NewUser::new("dup@example.com")).await.unwrap();
        let err = store
            .save(NewUser::new("dup@example.com"))
            .await
            .unwrap_err();

        assert!(err.is_duplicate());
        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![first]);
    }

    #[tokio::test]
    async fn rejected_duplicate_does_not_consume_an_id() {
        let store = InMemoryUserStore::new();
        store.save(NewUser::new("x@example.com")).await.unwrap();
        let _ = store.save(NewUser::new("x@example.com")).await;
        let next = store.save(NewUser::new("y@example.com")).await.unwrap();
        assert_eq!(next.id, UserId(2));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryUserStore::new();
        let other = store.clone();
        store.save(NewUser::new("shared@example.com")).await.unwrap();
        assert_eq!(other.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_registrations_admit_exactly_one() {
        let store = InMemoryUserStore::new();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.save(NewUser::new("race@example.com")).await
            }));
        }

        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(e) => assert!(e.is_duplicate()),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.len(), 1);
    }
}
