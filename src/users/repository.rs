// Credential store for user records

use std::collections::BTreeMap;

use axum::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::users::models::{NewUser, User};

/// Failures raised by a user store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The email is already registered, case-insensitively
    #[error("email already exists")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence interface for users, keyed by id and by email
///
/// Implementations must enforce email uniqueness atomically on `insert`:
/// of two concurrent inserts with the same email, at most one succeeds.
/// Mutations return `None`/`false` when the id does not exist.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users in insertion order
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Case-insensitive lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    async fn update_names(
        &self,
        id: i64,
        name: &str,
        last_name: &str,
    ) -> Result<Option<User>, StoreError>;

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, StoreError>;

    /// Hard delete, returning the removed record
    async fn delete(&self, id: i64) -> Result<Option<User>, StoreError>;
}

const USER_COLUMNS: &str = "id, name, last_name, email, password, created_at, updated_at";

/// Postgres-backed user store
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, last_name, email, password) VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // The unique index on LOWER(email) is the source of truth
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return StoreError::DuplicateEmail;
                }
            }
            StoreError::Database(e)
        })
    }

    async fn update_names(
        &self,
        id: i64,
        name: &str,
        last_name: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $1, last_name = $2, updated_at = NOW() WHERE id = $3 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(last_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
                .bind(password_hash)
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// In-process user store, used when no database is configured
///
/// Ids come from a monotonic counter and are never reused after a delete.
#[derive(Default)]
pub struct MemoryUserStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    users: BTreeMap<i64, User>,
}

impl MemoryState {
    fn email_taken(&self, email: &str) -> bool {
        self.find_by_email(email).is_some()
    }

    /// Matches emails the way `LOWER()` does, folding non-ASCII case too
    fn find_by_email(&self, email: &str) -> Option<&User> {
        let email = email.to_lowercase();
        self.users
            .values()
            .find(|user| user.email.to_lowercase() == email)
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.find_by_email(email).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        Ok(state.email_taken(email))
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        // Check and insert under the same write lock
        let mut state = self.state.write().await;
        if state.email_taken(&user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        state.last_id += 1;
        let now = Utc::now();
        let record = User {
            id: state.last_id,
            name: user.name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_names(
        &self,
        id: i64,
        name: &str,
        last_name: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|user| {
            user.name = name.to_string();
            user.last_name = last_name.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<Option<User>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.users.remove(&id))
    }
}
