use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
};
use rand::thread_rng;

#[cfg(test)]
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::error::AppError;

/// Slow, salted one-way hashing for passwords and for refresh tokens at
/// rest. The work factor is the Argon2 iteration count; verification
/// reads its cost from the stored digest, so old digests keep verifying
/// after the configured factor changes.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    #[cfg(test)]
    verify_calls: Arc<AtomicUsize>,
}

impl PasswordHasher {
    pub fn new(work_factor: u32) -> Result<Self, AppError> {
        let params = Params::new(Params::DEFAULT_M_COST, work_factor, Params::DEFAULT_P_COST, None)
            .map_err(|err| AppError::internal(format!("Invalid hash parameters: {err}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            #[cfg(test)]
            verify_calls: Arc::new(AtomicUsize::new(0)),
        })
    }

    #[cfg(test)]
    pub fn verify_call_count(&self) -> usize {
        self.verify_calls.load(Ordering::Relaxed)
    }

    /// Each call salts independently, so equal inputs produce distinct
    /// digests.
    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut thread_rng());
        let digest = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|_| AppError::internal("Password hashing failed"))?
            .to_string();
        Ok(digest)
    }

    /// Constant-time check. A malformed digest verifies false instead of
    /// erroring, so an empty stored hash behaves as a plain mismatch.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        #[cfg(test)]
        self.verify_calls.fetch_add(1, Ordering::Relaxed);

        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
