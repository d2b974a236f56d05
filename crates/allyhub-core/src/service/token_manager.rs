//! API token manager - issues bearer tokens and checks presented secrets.

use chrono::Utc;
use uuid::Uuid;

use super::secrets::{constant_time_eq, generate_secret, hash_secret};
use crate::domain::{token_hint, ApiToken, IssuedApiToken};
use crate::error::CoreResult;

/// Byte-string comparison used for token checks.
type Comparator = fn(&[u8], &[u8]) -> bool;

/// Issues and validates API tokens.
#[derive(Debug, Clone, Copy)]
pub struct ApiTokenManager {
    compare: Comparator,
}

impl ApiTokenManager {
    pub fn new() -> Self {
        Self {
            compare: constant_time_eq,
        }
    }

    #[cfg(test)]
    fn with_comparator(compare: Comparator) -> Self {
        Self { compare }
    }

    /// Fresh random token secret (64 hex chars), drawn independently of
    /// session ids
    pub fn generate_token(&self) -> CoreResult<String> {
        generate_secret()
    }

    /// New active token for `user_id` bound to `pool_id`.
    ///
    /// The stored half keeps only the digest and hint of the secret.
    pub fn create_token(
        &self,
        user_id: &str,
        name: &str,
        pool_id: &str,
    ) -> CoreResult<IssuedApiToken> {
        let secret = self.generate_token()?;
        let token = ApiToken {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            pool_id: pool_id.to_string(),
            token_hash: hash_secret(&secret),
            token_hint: token_hint(&secret),
            name: name.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            active: true,
        };
        Ok(IssuedApiToken { token, secret })
    }

    /// Check a presented secret against a stored token.
    ///
    /// Inactive tokens are rejected before any comparison. The digests are
    /// compared in constant time.
    pub fn validate(&self, provided: &str, stored: &ApiToken) -> bool {
        if !stored.active {
            return false;
        }
        let provided = hash_secret(provided);
        (self.compare)(provided.as_bytes(), stored.token_hash.as_bytes())
    }

    /// The pool this token is scoped to.
    ///
    /// The caller must still confirm the pool exists for `token.user_id`.
    pub fn pool_id_of<'a>(&self, token: &'a ApiToken) -> &'a str {
        &token.pool_id
    }
}

impl Default for ApiTokenManager {
    fn default() -> Self {
        Self::new()
    }
}
