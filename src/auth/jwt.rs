use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::store::User;

use super::types::Claims;

/// Paired signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret.as_bytes()),
            dec: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

pub fn now_unix() -> usize {
    chrono::Utc::now().timestamp() as usize
}

/// Issues and verifies the two token classes. Access and refresh tokens
/// carry the same claims but are signed with different secrets, so a
/// token of one class never verifies as the other.
#[derive(Clone)]
pub struct TokenCodec {
    access: JwtKeys,
    refresh: JwtKeys,
    access_ttl_secs: u64,
    refresh_ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(cfg: &AuthConfig) -> Self {
        Self {
            access: JwtKeys::from_secret(&cfg.access_secret),
            refresh: JwtKeys::from_secret(&cfg.refresh_secret),
            access_ttl_secs: cfg.access_ttl_secs,
            refresh_ttl_secs: cfg.refresh_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> u64 {
        self.access_ttl_secs
    }

    pub fn issue_access(&self, user: &User) -> Result<String, AppError> {
        self.issue(user, &self.access, self.access_ttl_secs as i64)
    }

    pub fn issue_refresh(&self, user: &User) -> Result<String, AppError> {
        self.issue(user, &self.refresh, self.refresh_ttl_secs)
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        Self::verify(token, &self.access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        Self::verify(token, &self.refresh)
    }

    fn issue(&self, user: &User, keys: &JwtKeys, ttl_secs: i64) -> Result<String, AppError> {
        let iat = now_unix();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            iat,
            exp: iat + ttl_secs as usize,
        };

        encode(&Header::default(), &claims, &keys.enc)
            .map_err(|_| AppError::internal("Token encoding failed"))
    }

    /// Every decode failure (bad signature, expired, malformed) collapses
    /// to the same unauthorized message.
    fn verify(token: &str, keys: &JwtKeys) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        decode::<Claims>(token, &keys.dec, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))
    }
}
