//! Account service - registration, login and session authentication

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::password::CredentialManager;
use super::session_manager::SessionManager;
use crate::domain::{Session, User};
use crate::error::{CoreError, CoreResult};
use crate::repository::{RepoError, SessionRepository, UserRepository};

/// Account lifecycle on top of the user and session repositories.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    credentials: CredentialManager,
    session_manager: SessionManager,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self {
            users,
            sessions,
            credentials: CredentialManager::new(),
            session_manager: SessionManager::new(),
        }
    }

    /// Replace the password hasher (lower bcrypt cost in tests)
    pub fn with_credential_manager(mut self, credentials: CredentialManager) -> Self {
        self.credentials = credentials;
        self
    }

    /// Register a new user.
    ///
    /// Fails with `Validation` on empty input and `Conflict` when the email
    /// is already taken.
    pub async fn register(&self, email: &str, password: &str) -> CoreResult<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(CoreError::validation("email and password are required"));
        }

        match self.users.get_by_email(email).await {
            Ok(_) => return Err(CoreError::Conflict("user already exists".to_string())),
            Err(RepoError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let hash = self.credentials.hash(password)?;
        let user = User::new(email, hash);

        // A concurrent registration can still win the race; the unique
        // index turns that into a Conflict here.
        self.users.create(&user).await?;

        info!(user_id = %user.id, "[AccountService] Registered user");
        Ok(user)
    }

    /// Check credentials and open a persisted 24h session.
    ///
    /// Every failure mode returns `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<Session> {
        let user = match self.users.get_by_email(email).await {
            Ok(user) => user,
            Err(RepoError::NotFound(_)) => {
                debug!("[AccountService] Login for unknown email");
                return Err(CoreError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.credentials.verify(password, &user.password_hash) {
            debug!(user_id = %user.id, "[AccountService] Login with wrong password");
            return Err(CoreError::InvalidCredentials);
        }

        let session = self.session_manager.create_session(&user.id)?;
        self.sessions.create(&session).await?;

        info!(
            user_id = %user.id,
            expires_at = %session.expires_at,
            "[AccountService] User logged in"
        );
        Ok(session)
    }

    /// Delete a session. Unknown or empty ids are a no-op.
    pub async fn logout(&self, session_id: &str) -> CoreResult<()> {
        if session_id.is_empty() {
            return Ok(());
        }
        self.sessions.delete(session_id).await?;
        debug!("[AccountService] Session closed");
        Ok(())
    }

    /// Resolve a session id to its user.
    ///
    /// A missing session, an expired session and a session whose user is
    /// gone are indistinguishable to the caller.
    pub async fn authenticate_session(&self, session_id: &str) -> CoreResult<User> {
        if session_id.is_empty() {
            return Err(CoreError::InvalidCredentials);
        }

        let session = match self.sessions.get(session_id).await {
            Ok(session) => session,
            Err(RepoError::NotFound(_)) => return Err(CoreError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !self.session_manager.is_valid(&session) {
            debug!(user_id = %session.user_id, "[AccountService] Session expired");
            return Err(CoreError::InvalidCredentials);
        }

        match self.users.get(&session.user_id).await {
            Ok(user) => Ok(user),
            Err(RepoError::NotFound(_)) => {
                warn!(user_id = %session.user_id, "[AccountService] Session for missing user");
                Err(CoreError::InvalidCredentials)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: &str) -> CoreResult<User> {
        Ok(self.users.get(user_id).await?)
    }

    /// Replace the password after checking the current one
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> CoreResult<User> {
        if new_password.is_empty() {
            return Err(CoreError::validation("new password is required"));
        }

        let mut user = self.users.get(user_id).await?;
        if !self.credentials.verify(current_password, &user.password_hash) {
            return Err(CoreError::InvalidCredentials);
        }

        user.password_hash = self.credentials.hash(new_password)?;
        user.touch();
        self.users.update(&user).await?;

        info!(user_id = %user_id, "[AccountService] Password changed");
        Ok(user)
    }

    /// Replace the email; a taken email is a `Conflict`
    pub async fn change_email(&self, user_id: &str, new_email: &str) -> CoreResult<User> {
        if new_email.trim().is_empty() {
            return Err(CoreError::validation("email is required"));
        }

        let mut user = self.users.get(user_id).await?;
        if user.email == new_email {
            return Ok(user);
        }

        match self.users.get_by_email(new_email).await {
            Ok(_) => return Err(CoreError::Conflict("email already in use".to_string())),
            Err(RepoError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        user.email = new_email.to_string();
        user.touch();
        self.users.update(&user).await?;

        info!(user_id = %user_id, "[AccountService] Email changed");
        Ok(user)
    }

    /// Delete every session that expired at or before `now`
    pub async fn sweep_expired_sessions(&self, now: DateTime<Utc>) -> CoreResult<u64> {
        let removed = self.sessions.delete_expired(now).await?;
        if removed > 0 {
            info!(removed, "[AccountService] Swept expired sessions");
        }
        Ok(removed)
    }
}
