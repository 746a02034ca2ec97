//! # roster-store — Entity Store for Users
//!
//! The persistence contract for [`roster_core::User`] and its adapters.
//!
//! ## Adapters
//!
//! | Adapter                | Backing                      | Uniqueness enforced by |
//! |------------------------|------------------------------|------------------------|
//! | [`PgUserStore`]        | PostgreSQL via a `PgPool`    | `UNIQUE (email)` column constraint |
//! | [`InMemoryUserStore`]  | `parking_lot::RwLock<Vec<_>>` | check-and-insert under one write lock |
//!
//! ## Failure Kinds
//!
//! Adapters report a duplicate email as [`StoreError::Duplicate`], distinct
//! from [`StoreError::Unavailable`] (connection, pool, or I/O failures).
//! Translation into domain failures happens one layer up, in the service.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryUserStore;
pub use postgres::{PgStoreConfig, PgUserStore, TableMapping, USERS};
pub use store::UserStore;
