//! API token entity - long-lived bearer credential scoped to one endpoint pool

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Characters of the secret kept in clear for recognition
pub const TOKEN_HINT_CHARS: usize = 4;

/// Bearer token bound to a single pool of a single user.
///
/// Only the SHA-256 digest of the secret is kept. The secret itself exists
/// once, in the [`IssuedApiToken`] handed to whoever created the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiToken {
    /// Unique identifier
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// The only pool this token authorizes
    pub pool_id: String,

    /// Hex SHA-256 digest of the secret
    #[serde(skip_serializing, default)]
    pub token_hash: String,

    /// Last characters of the secret
    pub token_hint: String,

    /// Human-readable label
    pub name: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last successful authentication, if any
    pub last_used_at: Option<DateTime<Utc>>,

    /// Inactive tokens never authenticate
    pub active: bool,
}

impl ApiToken {
    /// Redacted view safe to list
    pub fn summary(&self) -> ApiTokenSummary {
        ApiTokenSummary {
            id: self.id.clone(),
            pool_id: self.pool_id.clone(),
            name: self.name.clone(),
            token_hint: format!("…{}", self.token_hint),
            created_at: self.created_at,
            last_used_at: self.last_used_at,
            active: self.active,
        }
    }
}

/// A freshly created token together with its secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedApiToken {
    #[serde(flatten)]
    pub token: ApiToken,
    /// Bearer value; not recoverable after this
    pub secret: String,
}

/// Listing view of an [`ApiToken`] without the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTokenSummary {
    pub id: String,
    pub pool_id: String,
    pub name: String,
    /// Last four characters of the secret, for recognition only
    pub token_hint: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub active: bool,
}

/// Trailing characters of a secret, at most [`TOKEN_HINT_CHARS`]
pub fn token_hint(secret: &str) -> String {
    let start = secret
        .char_indices()
        .rev()
        .nth(TOKEN_HINT_CHARS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    secret[start..].to_string()
}
