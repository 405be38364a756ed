// JWT token generation and validation service

use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,        // user id
    pub email: String,
    pub exp: i64,        // expiration timestamp
    pub iat: i64,        // issued at timestamp
}

/// Token service for JWT operations
///
/// Tokens are HS256 signed and verified statelessly: there is no
/// server-side revocation list.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with a secret key and token lifetime
    pub fn new(secret: &str, token_duration: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_duration,
        }
    }

    /// Lifetime of issued tokens in seconds
    pub fn token_duration(&self) -> i64 {
        self.token_duration
    }

    /// Issue a bearer token for the given user
    pub fn generate_token(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now.checked_add(self.token_duration).ok_or_else(|| {
                AuthError::TokenGeneration("token expiry out of range".to_string())
            })?,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;
        debug!(user_id, "token issued");
        Ok(token)
    }

    /// Verify signature and expiry, returning the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No grace period on expiry
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes", 3600)
    }

    #[test]
    fn test_token_expiration_matches_configured_duration() {
        let service = TokenService::new("test_secret_key_for_testing_purposes", 900);
        let token = service.generate_token(1, "test@example.com").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(service.token_duration(), 900);
    }

    #[test]
    fn test_token_claims_contain_user_identity() {
        let service = test_token_service();
        let token = service.generate_token(42, "user@example.com").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "user@example.com");
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.validate_token("").is_err());
        assert!(service.validate_token("not.a.token").is_err());
        assert!(service.validate_token("invalid_token_format").is_err());
        assert!(service
            .validate_token("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret-number-one", 3600);
        let service2 = TokenService::new("secret-number-two", 3600);

        let token = service1.generate_token(1, "test@example.com").unwrap();

        assert!(service1.validate_token(&token).is_ok());
        assert!(matches!(
            service2.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let service = test_token_service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "test@example.com".to_string(),
            iat: now - 1000,
            exp: now - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_recently_expired_token_is_rejected() {
        let service = TokenService::new("test_secret_key_for_testing_purposes", -5);
        let token = service.generate_token(1, "test@example.com").unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_overflowing_lifetime_fails_to_issue() {
        let service = TokenService::new("test_secret_key_for_testing_purposes", i64::MAX);

        assert!(matches!(
            service.generate_token(1, "test@example.com"),
            Err(AuthError::TokenGeneration(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_token_claims_contain_identity(
            user_id in 1i64..1_000_000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let token = service.generate_token(user_id, &email)?;
            let claims = service.validate_token(&token)?;

            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.email, email);
        }

        #[test]
        fn prop_malformed_tokens_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.validate_token(&malformed).is_err());
        }
    }
}
