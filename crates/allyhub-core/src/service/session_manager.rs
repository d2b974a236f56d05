//! Session manager - issues and classifies login sessions.
//!
//! The manager never touches storage. Persisting a new session and deleting
//! stale ones is up to the caller.

use chrono::{DateTime, Utc};

use super::secrets::generate_secret;
use crate::domain::Session;
use crate::error::CoreResult;

/// Issues sessions with a fixed 24h lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionManager;

impl SessionManager {
    pub fn new() -> Self {
        Self
    }

    /// Fresh random session id (64 hex chars)
    pub fn generate_session_id(&self) -> CoreResult<String> {
        generate_secret()
    }

    /// New session for `user_id`, valid from now for 24 hours
    pub fn create_session(&self, user_id: &str) -> CoreResult<Session> {
        self.create_session_at(user_id, Utc::now())
    }

    /// New session for `user_id` starting at `now`
    pub fn create_session_at(&self, user_id: &str, now: DateTime<Utc>) -> CoreResult<Session> {
        Ok(Session::starting_at(self.generate_session_id()?, user_id, now))
    }

    /// Whether the session has not yet expired
    pub fn is_valid(&self, session: &Session) -> bool {
        session.is_valid_at(Utc::now())
    }
}
