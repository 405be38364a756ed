// User data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::extract::RequestBody;
use crate::validation::{non_empty, trimmed};

pub const SUCCESS: &str = "success";

/// User database model
///
/// `password_hash` maps to the `password` column and only ever holds an
/// Argon2 PHC string. It is never serialized; responses use `UserResponse`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to persist a new user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// User response model (excludes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "John")]
    pub name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body of POST /api/users
///
/// Every field is optional at the serde level so that a missing field is
/// reported as a per-field validation error instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "The name field is required."),
        length(min = 2, max = 255, message = "The name must be between 2 and 255 characters.")
    )]
    #[schema(example = "John")]
    pub name: Option<String>,

    #[validate(
        required(message = "The last name field is required."),
        length(min = 2, max = 255, message = "The last name must be between 2 and 255 characters.")
    )]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,

    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address."),
        length(max = 255, message = "The email must not be greater than 255 characters.")
    )]
    #[schema(example = "john@example.com")]
    pub email: Option<String>,

    #[validate(
        required(message = "The password field is required."),
        length(min = 8, message = "The password must be at least 8 characters.")
    )]
    #[schema(example = "password123", min_length = 8)]
    pub password: Option<String>,
}

impl RequestBody for CreateUserRequest {
    const FIELDS: &'static [&'static str] = &["name", "last_name", "email", "password"];

    fn normalized(self) -> Self {
        Self {
            name: trimmed(self.name),
            last_name: trimmed(self.last_name),
            email: trimmed(self.email),
            password: non_empty(self.password),
        }
    }
}

/// Body of PUT /api/users/{id}
///
/// Email and password cannot be changed through this request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(
        required(message = "The name field is required."),
        length(min = 2, max = 255, message = "The name must be between 2 and 255 characters.")
    )]
    #[schema(example = "Jane")]
    pub name: Option<String>,

    #[validate(
        required(message = "The last name field is required."),
        length(min = 2, max = 255, message = "The last name must be between 2 and 255 characters.")
    )]
    #[schema(example = "Roe")]
    pub last_name: Option<String>,
}

impl RequestBody for UpdateUserRequest {
    const FIELDS: &'static [&'static str] = &["name", "last_name"];

    fn normalized(self) -> Self {
        Self {
            name: trimmed(self.name),
            last_name: trimmed(self.last_name),
        }
    }
}

/// Body of POST /api/users/{id}/change-password
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(
        required(message = "The new password field is required."),
        length(min = 8, message = "The new password must be at least 8 characters.")
    )]
    #[schema(example = "newpassword123", min_length = 8)]
    pub new_password: Option<String>,
}

impl RequestBody for ChangePasswordRequest {
    const FIELDS: &'static [&'static str] = &["new_password"];

    fn normalized(self) -> Self {
        Self {
            new_password: non_empty(self.new_password),
        }
    }
}

/// Response of GET /api/users
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    #[schema(example = "success")]
    pub status: String,
    pub users: Vec<UserResponse>,
}

/// Response carrying a single user, with an optional message for mutations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    #[schema(example = "success")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserResponse,
}

impl UserEnvelope {
    pub fn new(user: User) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: None,
            user: user.into(),
        }
    }

    pub fn with_message(user: User, message: &str) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: Some(message.to_string()),
            user: user.into(),
        }
    }
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Password Changed Successfully")]
    pub message: String,
}
