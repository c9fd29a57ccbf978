use std::sync::Arc;

use crate::auth::PasswordHasher;
use crate::error::AppError;
use crate::store::{User, UserStore, normalize_email};

/// Resolves an identifier plus password to a user, or to nothing. The
/// caller decides what "nothing" means on the wire; this layer never
/// distinguishes unknown user, wrong password, and deactivated account.
#[derive(Clone)]
pub struct CredentialValidator {
    store: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
}

impl CredentialValidator {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// The identifier is tried as a username first, then as an email.
    /// A deactivated account short-circuits before any hash comparison.
    pub async fn validate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let user = match self.store.find_by_username(identifier).await? {
            Some(user) => Some(user),
            None => {
                self.store
                    .find_by_email(&normalize_email(identifier))
                    .await?
            }
        };

        let Some(user) = user else {
            return Ok(None);
        };

        if !user.is_active {
            return Ok(None);
        }

        if !self.hasher.verify(password, &user.password_hash) {
            return Ok(None);
        }

        Ok(Some(user))
    }
}
