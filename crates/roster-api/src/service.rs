//! # User Service Layer
//!
//! Wraps every entity store call and is the only failure-translation
//! boundary below the HTTP layer: raw [`StoreError`]s are logged here and
//! replaced with a [`ServiceError`], so the error translator never sees
//! storage-specific error shapes.
//!
//! Every store call is bounded by a timeout. A timeout is reported the
//! same way as an outage. Nothing is retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use roster_core::{NewUser, User};
use roster_store::{StoreError, UserStore};
use thiserror::Error;

/// Returned when listing users fails for any storage reason.
pub const LIST_USERS_UNAVAILABLE: &str =
    "An error has occurred when trying to get all users because of a database failure";

/// Returned when registering a user fails for any storage reason other
/// than a duplicate email.
pub const REGISTER_USER_UNAVAILABLE: &str =
    "An error has occurred when trying to register the user because of a database failure";

/// Domain-level failure raised by a [`UserService`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Another user already holds this email.
    #[error("email {email} is already registered")]
    EmailTaken {
        /// The conflicting email.
        email: String,
    },

    /// The store is unreachable, failing, or too slow. Carries a fixed,
    /// operator-facing message.
    #[error("{0}")]
    Unavailable(&'static str),
}

/// Contract the controllers depend on. Substitutable with a fake in tests.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user.
    async fn create_user(&self, new: NewUser) -> Result<User, ServiceError>;

    /// All registered users in insertion order.
    async fn list_users(&self) -> Result<Vec<User>, ServiceError>;
}

/// [`UserService`] backed by a [`UserStore`] handle.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn UserStore>,
    timeout: Duration,
}

impl UserDirectory {
    /// Store call timeout used unless overridden.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a service over `store` with [`Self::DEFAULT_TIMEOUT`].
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-call store timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run a store call under the configured timeout. A timeout is
    /// surfaced as [`StoreError::Unavailable`].
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::unavailable(
                operation,
                format!("timed out after {} ms", self.timeout.as_millis()),
            )),
        }
    }
}

#[async_trait]
impl UserService for UserDirectory {
    async fn create_user(&self, new: NewUser) -> Result<User, ServiceError> {
        match self.bounded("save", self.store.save(new)).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "registered user");
                Ok(user)
            }
            Err(StoreError::Duplicate { email }) => {
                tracing::debug!(%email, "registration rejected: email taken");
                Err(ServiceError::EmailTaken { email })
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to register user");
                Err(ServiceError::Unavailable(REGISTER_USER_UNAVAILABLE))
            }
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        self.bounded("find_all", self.store.find_all())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to list users");
                ServiceError::Unavailable(LIST_USERS_UNAVAILABLE)
            })
    }
}
