//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI 3.1
//! document. Printed by `roster-api openapi`; not served over HTTP.

use utoipa::OpenApi;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster API",
        version = "0.1.0",
        description = "Health probe plus user registration and listing.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::users::list_users,
        crate::routes::users::register_user,
    ),
    components(schemas(
        roster_core::User,
        roster_core::UserId,
        crate::routes::health::HealthResponse,
        crate::routes::users::RegisterUserRequest,
        crate::routes::users::RegisterUserResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "users", description = "User registration and listing"),
    )
)]
pub struct ApiDoc;

/// Render the document as pretty-printed JSON.
pub fn render() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        assert!(paths.contains(&"/health"));
        assert!(paths.contains(&"/users"));
        assert!(paths.contains(&"/api/users/register"));
    }

    #[test]
    fn renders_json_with_error_body_schema() {
        let json = render().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["components"]["schemas"]["ErrorBody"].is_object());
        assert!(value["components"]["schemas"]["User"].is_object());
    }
}
