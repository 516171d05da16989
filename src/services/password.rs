//! Password hashing.
//!
//! Argon2id with fixed parameters: 19 MiB of memory, 2 iterations, 1 lane.
//! Digests are PHC strings (`$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`)
//! so the algorithm, parameters and the per-password salt travel with them.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{AppError, AppResult};

/// Memory cost in KiB
pub const MEMORY_COST: u32 = 19 * 1024;
/// Number of passes over memory
pub const TIME_COST: u32 = 2;
pub const PARALLELISM: u32 = 1;

#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> AppResult<Self> {
        let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, None)
            .map_err(|e| AppError::Internal(format!("Invalid argon2 parameters: {}", e)))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Check `password` against a digest produced by [`PasswordHasher::hash`].
    ///
    /// A digest that cannot be parsed is an internal error, not a mismatch.
    pub fn verify(&self, password: &str, digest: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(digest)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// [`PasswordHasher::hash`] on the blocking pool
    pub async fn hash_blocking(&self, password: String) -> AppResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// [`PasswordHasher::verify`] on the blocking pool
    pub async fn verify_blocking(&self, password: String, digest: String) -> AppResult<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
    }
}
