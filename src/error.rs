// Error handling module for the User API
// Provides the HTTP error taxonomy and its JSON response bodies

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::auth::AuthError;
use crate::users::repository::StoreError;
use crate::validation;

/// Main error type for the API
/// All handlers return Result<T, ApiError>
///
/// Each variant maps to exactly one HTTP status code. Variants that wrap
/// internal faults never expose their details to the client; the details
/// are logged server-side instead.
#[derive(Debug)]
pub enum ApiError {
    /// Field-level input errors
    /// Maps to HTTP 422 Unprocessable Entity
    Validation(validator::ValidationErrors),

    /// Referenced user does not exist
    /// Maps to HTTP 404 Not Found
    NotFound,

    /// Missing, malformed, expired or forged bearer token
    /// Maps to HTTP 401 Unauthorized
    Unauthenticated,

    /// Login with an unknown email or a wrong password
    /// Maps to HTTP 401 Unauthorized
    InvalidCredentials,

    /// Credential store failures
    /// Maps to HTTP 500 Internal Server Error
    Store(StoreError),

    /// Any other unexpected fault (hashing, token signing)
    /// Maps to HTTP 500 Internal Server Error
    Internal(String),
}

/// Body of a 422 response
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    #[schema(example = "The given data was invalid.")]
    pub message: String,
    /// Field name to list of human readable messages
    #[schema(value_type = Object, example = json!({"name": ["The name field is required."]}))]
    pub errors: validation::FieldErrors,
}

pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated.";
pub const NOT_FOUND_MESSAGE: &str = "User Not Found";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email and Password dont match.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error";
pub const INVALID_DATA_MESSAGE: &str = "The given data was invalid.";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                debug!("Validation error: {:?}", errors);

                let body = ValidationErrorResponse {
                    message: INVALID_DATA_MESSAGE.to_string(),
                    errors: validation::field_messages(&errors),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            ApiError::NotFound => {
                debug!("User not found");
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "message": NOT_FOUND_MESSAGE })),
                )
                    .into_response()
            }
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": UNAUTHENTICATED_MESSAGE })),
            )
                .into_response(),
            ApiError::InvalidCredentials => {
                warn!("Rejected login attempt");
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": INVALID_CREDENTIALS_MESSAGE })),
                )
                    .into_response()
            }
            ApiError::Store(store_error) => {
                // Full detail stays in the logs
                error!("Store error: {:?}", store_error);
                server_error()
            }
            ApiError::Internal(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                server_error()
            }
        }
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": SERVER_ERROR_MESSAGE })),
    )
        .into_response()
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// A duplicate email that slipped past the pre-insert check is still a
/// validation failure on the email field
impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::DuplicateEmail => ApiError::Validation(validation::email_taken()),
            other => ApiError::Store(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                warn!("Unauthenticated request: {}", error);
                ApiError::Unauthenticated
            }
            AuthError::TokenGeneration(_) | AuthError::PasswordHash(_) => {
                ApiError::Internal(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"message": "User Not Found"}));
    }

    #[tokio::test]
    async fn test_unauthenticated_body_has_no_detail() {
        let response = ApiError::from(AuthError::ExpiredToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({"message": "Unauthenticated."}));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::Internal("argon2 exploded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, json!({"error": "Server error"}));
    }

    #[tokio::test]
    async fn test_duplicate_email_becomes_validation_error() {
        let error = ApiError::from(StoreError::DuplicateEmail);
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(error.into_response()).await;
        assert_eq!(body["message"], "The given data was invalid.");
        assert_eq!(body["errors"]["email"][0], "The email has already been taken.");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Store(StoreError::DuplicateEmail).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
