//! Password hashing (Argon2id, salted).
//!
//! Stored hashes are PHC strings, so the parameters travel with the hash and
//! a later cost change does not invalidate existing accounts.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::error;

use crate::error::ApiError;

/// Memory cost in KiB (19 MiB).
const MEMORY_COST_KIB: u32 = 19 * 1024;

/// Hashes and verifies passwords with a configurable time cost.
#[derive(Debug, Clone)]
pub struct PasswordHasherConfig {
    time_cost: u32,
}

impl PasswordHasherConfig {
    pub fn new(time_cost: u32) -> Self {
        PasswordHasherConfig { time_cost }
    }

    fn argon2(&self) -> Result<Argon2<'static>, ApiError> {
        let params = Params::new(MEMORY_COST_KIB, self.time_cost, 1, None).map_err(|e| {
            error!("Invalid Argon2 parameters: {}", e);
            ApiError::internal()
        })?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hashes `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                ApiError::internal()
            })?;
        Ok(hash.to_string())
    }

    /// True when `password` matches `stored_hash`. A malformed stored hash
    /// counts as a mismatch.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Stored password hash is malformed: {}", e);
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasherConfig::new(1);
        let hash = hasher.hash("s3cret").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("s3cret", &hash));
        assert!(!hasher.verify("wrong", &hash));
    }

    #[test]
    fn test_salted() {
        let hasher = PasswordHasherConfig::new(1);
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn test_cost_recorded_in_hash() {
        let hash = PasswordHasherConfig::new(3).hash("pw").unwrap();
        assert!(hash.contains("t=3"));
        // Verification reads parameters from the hash itself
        assert!(PasswordHasherConfig::new(1).verify("pw", &hash));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!PasswordHasherConfig::new(1).verify("pw", "not-a-hash"));
    }
}
