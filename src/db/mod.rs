//! Persistence collaborators: the movie catalog, user accounts and sessions.
//!
//! Each store is a trait so the HTTP layer and services can run against
//! PostgreSQL/Redis in production and in-memory stores in tests.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Movie, Session},
};

pub mod memory;
pub mod postgres;
pub mod redis;

pub use self::memory::{InMemoryCatalog, InMemorySessions, InMemoryUsers};
pub use self::postgres::{create_pool, PgCatalogStore, PgUserStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, RedisSessionStore};

/// Read-only access to the movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every catalog movie, ordered by movie id
    async fn fetch_all_movies(&self) -> AppResult<Vec<Movie>>;

    /// Up to `limit` movies chosen at random, offered to the user for rating
    async fn random_movies(&self, limit: usize) -> AppResult<Vec<Movie>>;
}

/// User account storage
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Stored password hash for `username`, if the account exists
    async fn find_password_hash(&self, username: &str) -> AppResult<Option<String>>;

    /// Creates an account; fails with `AppError::Conflict` if the name is taken
    async fn create_user(&self, username: &str, password_hash: &str) -> AppResult<()>;
}

/// Login sessions keyed by bearer token
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Opens a session for `username`
    async fn create(&self, username: &str) -> AppResult<Session>;

    /// Live session for `token`; expired sessions are reported as absent
    async fn get(&self, token: Uuid) -> AppResult<Option<Session>>;

    async fn revoke(&self, token: Uuid) -> AppResult<()>;
}

/// Username already registered
pub(crate) fn username_taken() -> crate::error::AppError {
    crate::error::AppError::Conflict("Username already exists!".to_string())
}
