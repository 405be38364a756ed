// Default administrator seeding

use tracing::info;

use crate::auth::password::PasswordService;
use crate::error::ApiError;
use crate::users::models::NewUser;
use crate::users::repository::{StoreError, UserStore};

pub const ADMIN_NAME: &str = "Admin";
pub const ADMIN_LAST_NAME: &str = "Admin Admin";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "password";

/// Ensure the default administrator exists
///
/// Returns `true` when the account was created and `false` when it was
/// already present. Safe to run on every startup.
pub async fn seed_default_admin(
    store: &dyn UserStore,
    passwords: &PasswordService,
) -> Result<bool, ApiError> {
    if store.email_exists(ADMIN_EMAIL).await? {
        info!("Default administrator already present");
        return Ok(false);
    }

    let password_hash = passwords.hash_password(ADMIN_PASSWORD)?;
    let result = store
        .insert(NewUser {
            name: ADMIN_NAME.to_string(),
            last_name: ADMIN_LAST_NAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash,
        })
        .await;

    match result {
        Ok(user) => {
            info!("Seeded default administrator with id: {}", user.id);
            Ok(true)
        }
        // Another instance seeded it first
        Err(StoreError::DuplicateEmail) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
