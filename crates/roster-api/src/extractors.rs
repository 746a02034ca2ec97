//! # Request Body Extraction & Validation
//!
//! Handlers take their body as `Result<Json<Value>, JsonRejection>` and run
//! it through [`extract_validated_json`] before doing anything else. The
//! payload is checked against a named JSON Schema first and only then
//! deserialized into the handler's DTO, so no service call ever sees an
//! unvalidated payload.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use roster_schema::SchemaValidator;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// A payload that passed schema validation.
///
/// Keeps the raw JSON next to the typed value so callers can echo exactly
/// what the client sent.
#[derive(Debug, Clone)]
pub struct Validated<T> {
    /// The body as received.
    pub raw: Value,
    /// The body deserialized into the handler's DTO.
    pub value: T,
}

/// Extract a JSON body, mapping rejections to [`AppError::BadRequest`].
///
/// Missing content type, malformed JSON and oversized bodies all end up
/// here, so every unparseable body gets the same error shape.
pub fn extract_json(result: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it against `schema_name`.
///
/// Every violation is collected, not just the first. A payload that passes
/// the schema but still fails to deserialize into `T` means the schema and
/// the DTO disagree, which is reported as an internal error.
pub fn extract_validated_json<T: DeserializeOwned>(
    schemas: &SchemaValidator,
    schema_name: &str,
    result: Result<Json<Value>, JsonRejection>,
) -> Result<Validated<T>, AppError> {
    let raw = extract_json(result)?;
    schemas.validate(schema_name, &raw)?;
    let value = serde_json::from_value(raw.clone()).map_err(|e| {
        AppError::Internal(format!(
            "payload accepted by {schema_name} but not deserializable: {e}"
        ))
    })?;
    Ok(Validated { raw, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_schema::USER_REGISTRATION_SCHEMA;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct EmailOnly {
        email: String,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct NeedsAge {
        email: String,
        age: u32,
    }

    fn schemas() -> SchemaValidator {
        SchemaValidator::builtin().unwrap()
    }

    #[test]
    fn valid_payload_keeps_raw_body() {
        let body = json!({"email": "ada@example.com", "nickname": "ada"});
        let validated: Validated<EmailOnly> =
            extract_validated_json(&schemas(), USER_REGISTRATION_SCHEMA, Ok(Json(body.clone())))
                .unwrap();
        assert_eq!(validated.value.email, "ada@example.com");
        assert_eq!(validated.raw, body);
    }

    #[test]
    fn missing_email_is_validation_error() {
        let err = extract_validated_json::<EmailOnly>(
            &schemas(),
            USER_REGISTRATION_SCHEMA,
            Ok(Json(json!({}))),
        )
        .unwrap_err();
        match err {
            AppError::Validation(v) => assert_eq!(v.fields(), vec!["email"]),
            other => panic!("expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_schema_is_internal() {
        let err = extract_validated_json::<EmailOnly>(
            &schemas(),
            "missing.schema.json",
            Ok(Json(json!({"email": "ada@example.com"}))),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn schema_and_dto_mismatch_is_internal() {
        let err = extract_validated_json::<NeedsAge>(
            &schemas(),
            USER_REGISTRATION_SCHEMA,
            Ok(Json(json!({"email": "ada@example.com"}))),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
