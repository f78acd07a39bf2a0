// HTTP API Error Types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::manager::DatabaseError;
use crate::validation::FieldErrors;

pub const MSG_UNAUTHORIZED: &str = "Unauthorized";
pub const MSG_BAD_CREDENTIALS: &str = "username or password is wrong";
pub const MSG_CONTACT_NOT_FOUND: &str = "not found";
pub const MSG_ADDRESS_NOT_FOUND: &str = "address not found";
pub const MSG_USERNAME_TAKEN: &str = "username already registered";
pub const MSG_INVALID_BODY: &str = "invalid request body";

/// Error taxonomy surfaced to clients.
///
/// Every variant renders as `{"errors": {<field or "message">: [..]}}`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation(FieldErrors),
    Conflict { field: String, message: String },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Validation(_) => 400,
            ApiError::Conflict { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Validation(_) => "The given data was invalid.",
            ApiError::Conflict { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(field_errors) => json!({ "errors": field_errors }),
            ApiError::Conflict { field, message } => {
                let mut errors = serde_json::Map::new();
                errors.insert(field.clone(), json!([message]));
                json!({ "errors": errors })
            }
            _ => json!({ "errors": { "message": [self.message()] } }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(field_errors: FieldErrors) -> Self {
        ApiError::Validation(field_errors)
    }

    pub fn conflict(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Conflict {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation("username") => {
                ApiError::conflict("username", MSG_USERNAME_TAKEN)
            }
            DatabaseError::UniqueViolation(column) => {
                tracing::error!("Unexpected unique violation on column: {}", column);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            DatabaseError::NotFound(what) => {
                // Row vanished between the ownership check and the write
                tracing::debug!("Row disappeared during request: {}", what);
                ApiError::not_found(MSG_CONTACT_NOT_FOUND)
            }
            DatabaseError::ConfigMissing(key) => {
                tracing::error!("Database configuration missing: {}", key);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Migrate(e) => {
                tracing::error!("Migration error: {}", e);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::bad_request(MSG_INVALID_BODY)
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_errors_use_message_key() {
        let err = ApiError::not_found(MSG_ADDRESS_NOT_FOUND);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_json(), json!({ "errors": { "message": ["address not found"] } }));

        let err = ApiError::unauthorized(MSG_UNAUTHORIZED);
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.to_json(), json!({ "errors": { "message": ["Unauthorized"] } }));
    }

    #[test]
    fn validation_errors_are_keyed_by_field() {
        let mut errors = FieldErrors::new();
        errors.insert("first_name".into(), vec!["The first name field is required.".into()]);
        let err = ApiError::validation(errors);
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_json(),
            json!({ "errors": { "first_name": ["The first name field is required."] } })
        );
    }

    #[test]
    fn username_race_maps_to_conflict() {
        let err: ApiError = DatabaseError::UniqueViolation("username").into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_json(),
            json!({ "errors": { "username": ["username already registered"] } })
        );
    }

    #[test]
    fn sql_errors_are_masked() {
        let err: ApiError = DatabaseError::Sqlx(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status_code(), 500);
        assert!(!err.to_json().to_string().contains("PoolTimedOut"));
    }
}
