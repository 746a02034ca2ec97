#![deny(missing_docs)]

//! # roster-core — Domain Types for the Roster User Service
//!
//! Defines the persisted [`User`] entity, its [`UserId`] newtype, and the
//! [`NewUser`] insert payload. Every other crate in the workspace depends
//! on this one; it has no internal dependencies and no I/O.
//!
//! ## Ownership
//!
//! The entity store is the sole owner of persisted users. The service and
//! HTTP layers only hold transient copies for the duration of one request.

pub mod user;

pub use user::{NewUser, User, UserId};
