//! # Application State
//!
//! Shared state passed to every route handler via the `State` extractor.
//! Cloning is cheap: every field is behind an `Arc` or is `Copy`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use roster_schema::{SchemaValidationError, SchemaValidator};
use roster_store::{InMemoryUserStore, UserStore};

use crate::service::{UserDirectory, UserService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Service the user controllers delegate to.
    pub users: Arc<dyn UserService>,
    /// Compiled request schemas.
    pub schemas: Arc<SchemaValidator>,
    /// When the process started serving; read by the health probe.
    pub started_at: Instant,
}

impl AppState {
    /// Build state over an arbitrary service.
    pub fn new(users: Arc<dyn UserService>, schemas: Arc<SchemaValidator>) -> Self {
        Self {
            users,
            schemas,
            started_at: Instant::now(),
        }
    }

    /// Build state over a store, wrapping it in a [`UserDirectory`] with
    /// the given per-call timeout and loading the built-in schemas.
    pub fn with_store(
        store: Arc<dyn UserStore>,
        timeout: Duration,
    ) -> Result<Self, SchemaValidationError> {
        let users = UserDirectory::new(store).with_timeout(timeout);
        Ok(Self::new(
            Arc::new(users),
            Arc::new(SchemaValidator::builtin()?),
        ))
    }

    /// State backed by a fresh [`InMemoryUserStore`].
    pub fn in_memory() -> Result<Self, SchemaValidationError> {
        Self::with_store(
            Arc::new(InMemoryUserStore::new()),
            UserDirectory::DEFAULT_TIMEOUT,
        )
    }

    /// Time elapsed since the state was created.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("schemas", &self.schemas)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}
