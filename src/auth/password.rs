//! Password hashing
//!
//! bcrypt produces self-describing `$2b$<cost>$<salt><hash>` strings with a
//! fresh random salt per call.

use super::CredentialError;

/// Hashes and verifies passwords at a fixed bcrypt cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password.
    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        hash_password(plaintext, self.cost)
    }

    /// Check a candidate against a stored hash.
    pub fn verify(&self, hash: &str, candidate: &str) -> bool {
        verify_password(hash, candidate)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

/// Hash `plaintext` with bcrypt at `cost`.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, CredentialError> {
    Ok(bcrypt::hash(plaintext, cost)?)
}

/// Constant-time comparison of `candidate` against `hash`.
///
/// Wrong password, corrupted hash and unsupported hash format all return
/// `false` so callers cannot tell them apart.
pub fn verify_password(hash: &str, candidate: &str) -> bool {
    match bcrypt::verify(candidate, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be verified");
            false
        }
    }
}
