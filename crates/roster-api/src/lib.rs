//! # roster-api — Axum HTTP Service
//!
//! A health probe plus a user resource (registration and listing) backed
//! by a relational store.
//!
//! ## API Surface
//!
//! | Method | Path                  | Module                |
//! |--------|-----------------------|-----------------------|
//! | GET    | `/health`             | [`routes::health`]    |
//! | GET    | `/users`              | [`routes::users`]     |
//! | POST   | `/api/users/register` | [`routes::users`]     |
//!
//! ## Request Pipeline
//!
//! ```text
//! Received → Validating → Dispatching → Responding
//!                 │             │
//!                 └── Rejected ─┴──→ AppError::into_response
//! ```
//!
//! Validation runs against embedded JSON Schemas before any service call.
//! Controllers delegate to a [`service::UserService`], which wraps the
//! [`roster_store::UserStore`] with timeouts and replaces storage failures
//! with domain errors. [`error::AppError`] is the single error translator.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CatchPanicLayer → Handler
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod service;
pub mod state;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router())
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
