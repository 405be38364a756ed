// Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::models::UserResponse;
use crate::extract::RequestBody;
use crate::validation::{non_empty, trimmed};

/// Login request DTO
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    #[schema(example = "admin@example.com")]
    pub email: Option<String>,

    #[validate(required(message = "The password field is required."))]
    #[schema(example = "password")]
    pub password: Option<String>,
}

impl RequestBody for LoginRequest {
    const FIELDS: &'static [&'static str] = &["email", "password"];

    fn normalized(self) -> Self {
        Self {
            email: trimmed(self.email),
            password: non_empty(self.password),
        }
    }
}

/// Successful login response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "success")]
    pub status: String,
    pub token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::field_messages;

    #[test]
    fn test_missing_password_is_reported() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"email": "test@example.com"}"#).unwrap();
        let errors = request.normalized().validate().unwrap_err();
        let messages = field_messages(&errors);

        assert_eq!(messages["password"], vec!["The password field is required."]);
        assert!(!messages.contains_key("email"));
    }
}
