//! Repository traits for data access (the persistence port)
//!
//! These traits define the storage contract without specifying the
//! implementation (SQLite, in-memory, etc.). Every `get` fails with
//! [`RepoError::NotFound`] on a miss so callers can tell "absent" apart from
//! a storage fault.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{ApiToken, EndpointPool, Session, User};

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// No row matched the key
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint was violated
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other storage fault
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound(_))
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user; a taken email is a `Conflict`
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Get a user by ID
    async fn get(&self, id: &str) -> RepoResult<User>;

    /// Get a user by exact email
    async fn get_by_email(&self, email: &str) -> RepoResult<User>;

    /// Rewrite email, password hash and updated timestamp
    async fn update(&self, user: &User) -> RepoResult<()>;
}

/// Endpoint pool repository trait.
///
/// Pools are always addressed by `(user_id, pool_id)`.
#[async_trait]
pub trait EndpointPoolRepository: Send + Sync {
    /// Insert a new pool row
    async fn create(&self, pool: &EndpointPool) -> RepoResult<()>;

    /// Get one pool of one user
    async fn get(&self, user_id: &str, pool_id: &str) -> RepoResult<EndpointPool>;

    /// All pools of a user, default pools first, then oldest first
    async fn list_for_user(&self, user_id: &str) -> RepoResult<Vec<EndpointPool>>;

    /// Replace the full row identified by `(pool.user_id, pool.id)`
    async fn update(&self, pool: &EndpointPool) -> RepoResult<()>;

    /// Delete a pool; deleting a missing pool is not an error
    async fn delete(&self, user_id: &str, pool_id: &str) -> RepoResult<()>;
}

/// API token repository trait
#[async_trait]
pub trait ApiTokenRepository: Send + Sync {
    /// Insert a new token
    async fn create(&self, token: &ApiToken) -> RepoResult<()>;

    /// Get a token by ID
    async fn get(&self, id: &str) -> RepoResult<ApiToken>;

    /// Look up a token by the digest of its secret
    async fn find_by_hash(&self, token_hash: &str) -> RepoResult<ApiToken>;

    /// All tokens of a user, newest first
    async fn list_for_user(&self, user_id: &str) -> RepoResult<Vec<ApiToken>>;

    /// Replace the full token row
    async fn update(&self, token: &ApiToken) -> RepoResult<()>;

    /// Record a use of an active token, touching nothing else.
    ///
    /// Returns whether a row was stamped; inactive or missing tokens are not.
    async fn touch_last_used(&self, id: &str, at: DateTime<Utc>) -> RepoResult<bool>;

    /// Delete a token by ID; deleting a missing token is not an error
    async fn delete(&self, id: &str) -> RepoResult<()>;
}

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session
    async fn create(&self, session: &Session) -> RepoResult<()>;

    /// Get a session by ID (expired sessions are still returned)
    async fn get(&self, id: &str) -> RepoResult<Session>;

    /// Delete a session; deleting a missing session is not an error
    async fn delete(&self, id: &str) -> RepoResult<()>;

    /// Delete every session whose expiry is at or before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}
