//! # Route Modules
//!
//! Each module defines an Axum Router for one API surface area.
//! Routers are merged into the application in [`crate::app`].

pub mod health;
pub mod users;
