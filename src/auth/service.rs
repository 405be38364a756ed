// Authentication service - credential check and token issuance

use std::sync::Arc;

use tracing::{debug, info};
use validator::Validate;

use crate::auth::{
    models::{LoginRequest, LoginResponse},
    password::PasswordService,
    token::TokenService,
};
use crate::error::ApiError;
use crate::extract::RequestBody;
use crate::users::{models::SUCCESS, UserStore};

/// Authentication service exchanging credentials for a bearer token
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    passwords: PasswordService,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        passwords: PasswordService,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
        }
    }

    /// Login a user
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let request = request.normalized();
        request.validate()?;

        let (Some(email), Some(password)) = (request.email, request.password) else {
            return Err(ApiError::Internal(
                "required fields missing after validation".to_string(),
            ));
        };

        let Some(user) = self.store.find_by_email(&email).await? else {
            debug!("Login for unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        if !self.passwords.verify_password(&password, &user.password_hash)? {
            debug!("Wrong password for user_id={}", user.id);
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.tokens.generate_token(user.id, &user.email)?;
        info!("User {} logged in", user.id);

        Ok(LoginResponse {
            status: SUCCESS.to_string(),
            token,
            token_type: "bearer".to_string(),
            expires_in: self.tokens.token_duration(),
            user: user.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{models::NewUser, MemoryUserStore};

    async fn service_with_user(email: &str, password: &str) -> AuthService {
        let passwords = PasswordService::with_params(8, 1, 1).unwrap();
        let store = Arc::new(MemoryUserStore::new());
        store
            .insert(NewUser {
                name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: email.to_string(),
                password_hash: passwords.hash_password(password).unwrap(),
            })
            .await
            .unwrap();

        AuthService::new(
            store,
            passwords,
            Arc::new(TokenService::new("test_secret_key_for_testing_purposes", 3600)),
        )
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials() {
        let service = service_with_user("test@example.com", "password123").await;
        let response = service
            .login(login("test@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(response.user.email, "test@example.com");
        assert_eq!(response.expires_in, 3600);
        assert!(!response.token.is_empty());
    }

    #[tokio::test]
    async fn test_login_email_is_case_insensitive() {
        let service = service_with_user("test@example.com", "password123").await;
        assert!(service
            .login(login("TEST@example.com", "password123"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let service = service_with_user("test@example.com", "password123").await;
        let result = service.login(login("test@example.com", "wrongpassword")).await;
        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_with_unknown_email() {
        let service = service_with_user("test@example.com", "password123").await;
        let result = service.login(login("nobody@example.com", "password123")).await;
        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_with_missing_fields() {
        let service = service_with_user("test@example.com", "password123").await;
        let result = service.login(LoginRequest::default()).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
