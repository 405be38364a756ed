// User service - business logic behind the /api/users endpoints

use std::sync::Arc;

use tracing::{debug, info};
use validator::{Validate, ValidationErrors};

use crate::auth::password::PasswordService;
use crate::error::ApiError;
use crate::extract::RequestBody;
use crate::users::models::{
    ChangePasswordRequest, CreateUserRequest, NewUser, UpdateUserRequest, User,
};
use crate::users::repository::UserStore;
use crate::validation;

/// Service coordinating the credential store and password hashing
///
/// Each operation touches at most one record. Missing ids are reported as
/// `ApiError::NotFound` by every read and mutation.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    passwords: PasswordService,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, passwords: PasswordService) -> Self {
        Self { store, passwords }
    }

    /// All users, in insertion order
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let users = self.store.list().await?;
        debug!("Retrieved {} users", users.len());
        Ok(users)
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        self.store.find_by_id(id).await?.ok_or_else(|| {
            debug!("User with id {} not found", id);
            ApiError::NotFound
        })
    }

    /// Create a user after validating every field
    ///
    /// A taken email is reported on the `email` field together with any
    /// other field errors of the same request, and nothing is written.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, ApiError> {
        let request = request.normalized();

        let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);
        if !errors.field_errors().contains_key("email") {
            if let Some(email) = request.email.as_deref() {
                if self.store.email_exists(email).await? {
                    validation::add_email_taken(&mut errors);
                }
            }
        }
        if !validation::is_clean(&errors) {
            return Err(ApiError::Validation(errors));
        }

        let (Some(name), Some(last_name), Some(email), Some(password)) =
            (request.name, request.last_name, request.email, request.password)
        else {
            return Err(ApiError::Internal(
                "required fields missing after validation".to_string(),
            ));
        };

        let password_hash = self.passwords.hash_password(&password)?;
        let user = self
            .store
            .insert(NewUser {
                name,
                last_name,
                email,
                password_hash,
            })
            .await?;

        info!("Created user with id: {}", user.id);
        Ok(user)
    }

    /// Replace the name and last name of a user
    ///
    /// Input is validated before the lookup, so invalid input on a missing
    /// id yields a validation error rather than not found.
    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<User, ApiError> {
        let request = request.normalized();
        request.validate()?;

        let (Some(name), Some(last_name)) = (request.name, request.last_name) else {
            return Err(ApiError::Internal(
                "required fields missing after validation".to_string(),
            ));
        };

        let user = self
            .store
            .update_names(id, &name, &last_name)
            .await?
            .ok_or_else(|| {
                debug!("User with id {} not found for update", id);
                ApiError::NotFound
            })?;

        info!("Updated user with id: {}", id);
        Ok(user)
    }

    /// Hard-delete a user, returning its last known values
    pub async fn delete(&self, id: i64) -> Result<User, ApiError> {
        let user = self.store.delete(id).await?.ok_or_else(|| {
            debug!("User with id {} not found for deletion", id);
            ApiError::NotFound
        })?;

        info!("Deleted user with id: {}", id);
        Ok(user)
    }

    /// Store a new password hash for a user
    ///
    /// The lookup happens before validation: a missing id is reported as
    /// not found whatever the input.
    pub async fn change_password(
        &self,
        id: i64,
        request: ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        if self.store.find_by_id(id).await?.is_none() {
            debug!("User with id {} not found for password change", id);
            return Err(ApiError::NotFound);
        }

        let request = request.normalized();
        request.validate()?;
        let Some(new_password) = request.new_password else {
            return Err(ApiError::Internal(
                "required fields missing after validation".to_string(),
            ));
        };

        let password_hash = self.passwords.hash_password(&new_password)?;
        if !self.store.update_password(id, &password_hash).await? {
            // Deleted between the lookup and the write
            return Err(ApiError::NotFound);
        }

        info!("Changed password for user with id: {}", id);
        Ok(())
    }
}
