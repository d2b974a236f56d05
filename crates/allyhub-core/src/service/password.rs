//! Credential manager - one-way password hashing via bcrypt.

use crate::error::{CoreError, CoreResult};

/// bcrypt cost factor.
pub const BCRYPT_COST: u32 = 10;

/// Hashes and verifies account passwords.
///
/// No password policy is enforced here; any string can be hashed.
#[derive(Debug, Clone, Copy)]
pub struct CredentialManager {
    cost: u32,
}

impl CredentialManager {
    /// Manager with the production work factor
    pub fn new() -> Self {
        Self { cost: BCRYPT_COST }
    }

    /// Manager with a custom work factor (bcrypt accepts 4..=31)
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password with a fresh salt
    pub fn hash(&self, password: &str) -> CoreResult<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| CoreError::Credential(format!("bcrypt hash: {e}")))
    }

    /// Check a password against a stored hash.
    ///
    /// A malformed hash counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::debug!(error = %e, "Password hash could not be verified");
                false
            }
        }
    }
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self::new()
    }
}
