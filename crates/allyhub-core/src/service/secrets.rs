//! Random secret generation and constant-time comparison.

use ring::digest::{digest, SHA256};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{CoreError, CoreResult};

/// Bytes of entropy in every session id and API token (256 bits).
pub const SECRET_BYTES: usize = 32;

/// Generate a hex-encoded secret from the system CSPRNG.
///
/// Each call draws fresh bytes; nothing about the caller, the user or the
/// clock goes into the value.
pub fn generate_secret() -> CoreResult<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; SECRET_BYTES];
    rng.fill(&mut bytes)
        .map_err(|_| CoreError::Credential("system random source unavailable".to_string()))?;
    Ok(hex::encode(bytes))
}

/// Hex SHA-256 digest of a secret, the form in which token secrets are stored
pub fn hash_secret(secret: &str) -> String {
    hex::encode(digest(&SHA256, secret.as_bytes()).as_ref())
}

/// Compare two byte strings without short-circuiting on the first mismatch.
///
/// Runtime depends only on the lengths, never on where the inputs differ.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (left, right) in a.iter().zip(b.iter()) {
        diff |= left ^ right;
    }
    std::hint::black_box(diff) == 0
}
