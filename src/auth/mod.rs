// Authentication module
// Bearer token issuance and verification, password hashing and the auth gate

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::login_handler;
pub use middleware::{require_auth, AuthenticatedUser};
pub use models::{LoginRequest, LoginResponse};
pub use password::PasswordService;
pub use service::AuthService;
pub use token::TokenService;
