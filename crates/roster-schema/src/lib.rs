//! # roster-schema — Request Payload Validation
//!
//! The validation stage of the request pipeline. Incoming JSON payloads
//! are checked against declared JSON Schemas (Draft 2020-12) before any
//! business logic runs.
//!
//! ## Runtime Validation (`validate`)
//!
//! [`SchemaValidator`] compiles every embedded schema once at construction
//! and validates documents against them by name:
//!
//! - [`SchemaValidator::builtin`] — loads the schemas shipped in `schemas/`.
//! - [`SchemaValidator::validate`] — checks a payload, reporting **all**
//!   violations rather than stopping at the first one.
//!
//! ## Crate Policy
//!
//! - No internal crate dependencies.
//! - Schema validation is a trust boundary: invalid payloads are rejected
//!   with the failing field(s) and a human-readable reason per field.

pub mod validate;

pub use validate::{
    SchemaValidationError, SchemaValidator, ValidationViolations, Violation,
    USER_REGISTRATION_SCHEMA,
};
