//! User entity - identity anchor for sessions, tokens and pools

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
///
/// The password hash is carried for the auth flow only and is never written
/// to any outward representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,

    /// Login email, unique and case-sensitive as stored
    pub email: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (email or password change)
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user from an email and an already-hashed password
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the user as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
