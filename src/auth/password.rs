// Password hashing and verification service

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::auth::error::AuthError;

/// Password service for hashing and verification
///
/// Hashes are Argon2id PHC strings; the parameters used to produce a hash
/// are encoded in it, so verification works across parameter changes.
#[derive(Clone, Default)]
pub struct PasswordService {
    params: Params,
}

impl PasswordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom Argon2 cost parameters (memory in KiB, iterations, lanes)
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, AuthError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password using Argon2id with a fresh random salt
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                AuthError::PasswordHash(e.to_string())
            })
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            AuthError::PasswordHash(e.to_string())
        })?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_service() -> PasswordService {
        PasswordService::with_params(8, 1, 1).unwrap()
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let service = fast_service();
        let hash = service.hash_password("Secur3P@ssw0rd!").unwrap();
        assert!(service.verify_password("Secur3P@ssw0rd!", &hash).unwrap());
    }

    #[test]
    fn hash_is_never_the_plaintext() {
        let service = fast_service();
        let hash = service.hash_password("password123").unwrap();
        assert_ne!(hash, "password123");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let service = fast_service();
        let first = service.hash_password("password123").unwrap();
        let second = service.hash_password("password123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let service = fast_service();
        let hash = service.hash_password("correct-horse-battery-staple").unwrap();
        assert!(!service.verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = fast_service()
            .verify_password("anything", "not-a-valid-hash")
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordHash(_)));
    }

    #[test]
    fn verify_uses_parameters_from_hash() {
        let hash = fast_service().hash_password("password123").unwrap();
        let other = PasswordService::with_params(16, 2, 1).unwrap();
        assert!(other.verify_password("password123", &hash).unwrap());
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(PasswordService::with_params(0, 0, 0).is_err());
    }
}
