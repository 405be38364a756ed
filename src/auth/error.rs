// Authentication error types

use thiserror::Error;

/// Failures raised by the token and hashing services
///
/// These never reach the client directly; `ApiError` folds every token
/// variant into the same 401 and the rest into a generic 500.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}
