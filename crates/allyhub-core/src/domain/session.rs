//! Session entity - proof of interactive (cookie) authentication

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fixed session lifetime. Expiry never slides.
pub const SESSION_LIFETIME_HOURS: i64 = 24;

/// Name of the browser cookie carrying the session id.
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// A login session.
///
/// The id is the secret: whoever holds it is authenticated as `user_id`
/// until `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Random session identifier (the cookie value)
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Expiry timestamp, exclusive
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session starting at `created_at` with the fixed lifetime
    pub fn starting_at(
        id: impl Into<String>,
        user_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            created_at,
            expires_at: created_at + Duration::hours(SESSION_LIFETIME_HOURS),
        }
    }

    /// Whether the session is still valid at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Cookie attributes for the HTTP layer.
///
/// The core only describes the cookie; setting it on a response is up to the
/// request-handling collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: &'static str,
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub http_only: bool,
    pub same_site: &'static str,
}

impl SessionCookie {
    /// Cookie issued on successful login
    pub fn issue(session: &Session) -> Self {
        Self {
            name: SESSION_COOKIE_NAME,
            value: session.id.clone(),
            expires_at: session.expires_at,
            http_only: true,
            same_site: "Lax",
        }
    }

    /// Cookie that clears the session on logout or rejection
    pub fn cleared() -> Self {
        Self {
            name: SESSION_COOKIE_NAME,
            value: String::new(),
            expires_at: DateTime::<Utc>::default(),
            http_only: true,
            same_site: "Lax",
        }
    }
}
