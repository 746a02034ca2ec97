//! # Schema Validation
//!
//! Runtime validation of JSON request payloads against JSON Schema
//! definitions (Draft 2020-12) with format assertion enabled, so
//! `"format": "email"` is enforced rather than treated as an annotation.
//!
//! ## Reporting Strategy
//!
//! Validation is collect-all: every violation in the payload is reported
//! in one [`SchemaValidationError::ValidationFailed`], each carrying the
//! failing field and a human-readable reason.
//!
//! ## Schema Resolution
//!
//! Schemas are embedded at compile time and registered under their
//! filename (e.g. `user-registration.schema.json`). They are compiled
//! once; validating a payload never re-parses a schema.

use std::collections::HashMap;
use std::fmt;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

/// Name of the schema guarding `POST /api/users/register`.
pub const USER_REGISTRATION_SCHEMA: &str = "user-registration.schema.json";

/// Schemas shipped with the crate, as `(name, source)` pairs.
const BUILTIN_SCHEMAS: &[(&str, &str)] = &[(
    USER_REGISTRATION_SCHEMA,
    include_str!("../schemas/user-registration.schema.json"),
)];

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The payload did not conform to the schema.
    #[error("validation failed against schema '{schema_name}': {violations}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// No schema is registered under the requested name.
    #[error("schema not found: '{schema_name}'")]
    SchemaNotFound {
        /// Requested schema name.
        schema_name: String,
    },

    /// The schema source could not be parsed as JSON.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Top-level payload field the violation is attributed to, or
    /// `(root)` when it concerns the document as a whole.
    pub field: String,
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Distinct failing fields, in the order they were first reported.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for v in &self.violations {
            if !fields.contains(&v.field.as_str()) {
                fields.push(&v.field);
            }
        }
        fields
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A set of compiled schemas backed by the `jsonschema` crate.
///
/// `SchemaValidator` is `Send + Sync`; share it behind an `Arc` across
/// request handlers.
pub struct SchemaValidator {
    validators: HashMap<String, Validator>,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schemas", &self.schema_names())
            .finish()
    }
}

impl SchemaValidator {
    /// Create a validator with no registered schemas.
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Create a validator with every schema embedded in the crate.
    ///
    /// # Errors
    ///
    /// Returns `SchemaLoadError` or `ValidatorBuildError` if an embedded
    /// schema is malformed.
    pub fn builtin() -> Result<Self, SchemaValidationError> {
        let mut validator = Self::empty();
        for (name, source) in BUILTIN_SCHEMAS {
            let value: Value = serde_json::from_str(source).map_err(|e| {
                SchemaValidationError::SchemaLoadError {
                    schema_name: (*name).to_string(),
                    reason: format!("invalid JSON: {e}"),
                }
            })?;
            validator.register(name, &value)?;
        }
        tracing::debug!(schemas = ?validator.schema_names(), "compiled request schemas");
        Ok(validator)
    }

    /// Compile `schema` and register it under `name`, replacing any
    /// schema previously registered under that name.
    pub fn register(&mut self, name: &str, schema: &Value) -> Result<(), SchemaValidationError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.should_validate_formats(true);

        let compiled =
            opts.build(schema)
                .map_err(|e| SchemaValidationError::ValidatorBuildError {
                    schema_name: name.to_string(),
                    reason: e.to_string(),
                })?;
        self.validators.insert(name.to_string(), compiled);
        Ok(())
    }

    /// Returns the number of registered schemas.
    pub fn schema_count(&self) -> usize {
        self.validators.len()
    }

    /// Returns the names of all registered schemas, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Validate `instance` against the schema registered as `schema_name`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaNotFound` for an unknown schema, or `ValidationFailed`
    /// carrying every violation found in the payload.
    pub fn validate(&self, schema_name: &str, instance: &Value) -> Result<(), SchemaValidationError> {
        let validator = self.validators.get(schema_name).ok_or_else(|| {
            SchemaValidationError::SchemaNotFound {
                schema_name: schema_name.to_string(),
            }
        })?;

        let violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| {
                let instance_path = e.instance_path.to_string();
                let schema_path = e.schema_path.to_string();
                let message = e.to_string();
                Violation {
                    field: attribute_field(&instance_path, &schema_path, &message),
                    instance_path,
                    schema_path,
                    message,
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_name: schema_name.to_string(),
                violations: ValidationViolations { violations },
            })
        }
    }
}

/// Work out which top-level field a violation belongs to.
///
/// `required` violations are reported against the parent object, so the
/// missing property name is taken from the quoted prefix of the message
/// (`"email" is a required property`).
fn attribute_field(instance_path: &str, schema_path: &str, message: &str) -> String {
    if schema_path.ends_with("/required") {
        if let Some(name) = message.split('"').nth(1) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    instance_path
        .trim_start_matches('/')
        .split('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("(root)")
        .to_string()
}
