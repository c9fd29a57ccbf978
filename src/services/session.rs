use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::{PasswordHasher, Role, TokenCodec, TokenPair};
use crate::config::{AdminSeedConfig, AuthConfig};
use crate::error::AppError;
use crate::store::{NewUser, RefreshSession, StoreError, User, UserStore};

use super::credentials::CredentialValidator;

pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
}

/// Orchestrates the session lifecycle: register, login, refresh
/// rotation, and logout. Every issued refresh token is hashed and
/// stored on the user row, so at most one refresh token per user is
/// live at a time and all of them die with a logout.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn UserStore>,
    codec: TokenCodec,
    hasher: Arc<PasswordHasher>,
    validator: CredentialValidator,
    refresh_ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn UserStore>, cfg: &AuthConfig) -> Result<Self, AppError> {
        let hasher = Arc::new(PasswordHasher::new(cfg.hash_work_factor)?);
        let validator = CredentialValidator::new(store.clone(), hasher.clone());

        Ok(Self {
            store,
            codec: TokenCodec::new(cfg),
            hasher,
            validator,
            refresh_ttl: Duration::seconds(cfg.refresh_ttl_secs),
        })
    }

    pub async fn register(&self, account: NewAccount) -> Result<TokenPair, AppError> {
        let username = account.username.trim().to_string();
        let email = account.email.trim().to_string();

        if username.is_empty() {
            return Err(AppError::bad_request("Username must not be empty"));
        }
        if email.is_empty() {
            return Err(AppError::bad_request("Email must not be empty"));
        }

        let user = self
            .store
            .create(NewUser {
                username,
                email,
                password_hash: self.hasher.hash(&account.password)?,
                role: account.role.unwrap_or(Role::User),
                first_name: account.first_name,
                last_name: account.last_name,
            })
            .await
            .map_err(|err| match err {
                StoreError::Duplicate { field: "username" } => {
                    AppError::conflict("Username already exists")
                }
                StoreError::Duplicate { field: "email" } => {
                    AppError::conflict("Email already exists")
                }
                other => other.into(),
            })?;

        self.issue_session(&user).await
    }

    pub async fn login(&self, identifier: &str, password: &str) -> Result<TokenPair, AppError> {
        let user = self
            .validator
            .validate(identifier, password)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        self.store.set_last_login(&user.id, Utc::now()).await?;
        self.issue_session(&user).await
    }

    /// Verifies the presented refresh token against both the signature
    /// and the stored hash, then rotates: a fresh pair is issued and
    /// the old token stops matching. Any failure on this path reads as
    /// the same unauthorized error.
    pub async fn refresh(&self, token: &str) -> Result<TokenPair, AppError> {
        match self.rotate_refresh(token).await {
            Ok(pair) => Ok(pair),
            Err(AppError::Unauthorized(_)) => {
                Err(AppError::unauthorized("Invalid refresh token"))
            }
            Err(err) => {
                tracing::warn!(error = %err, "refresh rotation failed");
                Err(AppError::unauthorized("Invalid refresh token"))
            }
        }
    }

    async fn rotate_refresh(&self, token: &str) -> Result<TokenPair, AppError> {
        let claims = self.codec.verify_refresh(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid refresh token"))?;

        let user = self
            .store
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        if !user.is_active {
            return Err(AppError::unauthorized("Invalid refresh token"));
        }

        let stored_hash = user.refresh_token_hash.as_deref().unwrap_or("");
        if !self.hasher.verify(token, stored_hash) {
            return Err(AppError::unauthorized("Invalid refresh token"));
        }

        // The stored expiry is the revocation horizon; it can cut a
        // token off before its JWT exp does.
        match user.refresh_token_expires_at {
            Some(expires_at) if expires_at > Utc::now() => {}
            _ => return Err(AppError::unauthorized("Invalid refresh token")),
        }

        self.issue_session(&user).await
    }

    /// Clears the stored refresh pair. Already-logged-out and unknown
    /// users succeed too; logout is idempotent.
    pub async fn logout(&self, user_id: &Uuid) -> Result<(), AppError> {
        match self.store.set_refresh_session(user_id, None).await {
            Ok(()) | Err(StoreError::NotFound { .. }) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Creates the configured admin account on startup unless the
    /// username is already taken.
    pub async fn seed_admin(&self, seed: &AdminSeedConfig) -> anyhow::Result<()> {
        if self.store.find_by_username(&seed.username).await?.is_some() {
            tracing::info!(username = %seed.username, "admin user already present, skipping seed");
            return Ok(());
        }

        let user = self
            .store
            .create(NewUser {
                username: seed.username.clone(),
                email: seed.email.clone(),
                password_hash: self.hasher.hash(&seed.password)?,
                role: Role::Admin,
                first_name: None,
                last_name: None,
            })
            .await?;

        tracing::info!(username = %user.username, id = %user.id, role = user.role.as_str(), "seeded admin user");
        Ok(())
    }

    async fn issue_session(&self, user: &User) -> Result<TokenPair, AppError> {
        let access_token = self.codec.issue_access(user)?;
        let refresh_token = self.codec.issue_refresh(user)?;

        self.store
            .set_refresh_session(
                &user.id,
                Some(RefreshSession {
                    token_hash: self.hasher.hash(&refresh_token)?,
                    expires_at: Utc::now() + self.refresh_ttl,
                }),
            )
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: self.codec.access_ttl_secs() as usize,
            user: user.into(),
        })
    }
}
