// User management module
// Credential store, CRUD service and HTTP handlers for /api/users

pub mod handlers;
pub mod models;
pub mod repository;
pub mod seed;
pub mod service;

pub use models::{User, UserResponse};
pub use repository::{MemoryUserStore, PgUserStore, StoreError, UserStore};
pub use service::UserService;
