pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Role;

pub use memory::MemoryUserStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{field} already exists")]
    Duplicate { field: &'static str },
    #[error("user not found (id={id})")]
    NotFound { id: Uuid },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User record as the persistence layer holds it. The auth core only
/// reads and writes the fields below; everything else about a user
/// belongs to the surrounding application. Deliberately not
/// serializable: the outward shape is `PublicUser`, which carries
/// neither the password hash nor the refresh pair.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub refresh_token_hash: Option<String>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// The hashed refresh credential and its server-side revocation horizon.
/// The two values travel as one unit so the store can never persist one
/// without the other.
#[derive(Debug, Clone)]
pub struct RefreshSession {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Lowercased, trimmed form used for every email comparison and insert.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lookup and mutation surface the auth core needs from the backing
/// user table. Username matches are case-sensitive; `find_by_email`
/// expects an already-normalized address.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Insert a new active user, enforcing username and email uniqueness.
    /// Uniqueness must be checked username first, then email: when both
    /// fields collide, the reported duplicate is `username`. Callers
    /// surface registration conflicts in that order.
    async fn create(&self, new_user: NewUser) -> StoreResult<User>;

    async fn set_last_login(&self, id: &Uuid, at: DateTime<Utc>) -> StoreResult<()>;

    /// Overwrite or clear the refresh pair. Concurrent writers race and
    /// the last completed write wins; at most one refresh token stays
    /// valid per user.
    async fn set_refresh_session(
        &self,
        id: &Uuid,
        session: Option<RefreshSession>,
    ) -> StoreResult<()>;

    async fn set_active(&self, id: &Uuid, active: bool) -> StoreResult<()>;
}
