//! Application services - wiring layer for the request-handling collaborator
//!
//! The HTTP layer (outside this workspace) holds one [`CoreServices`] and
//! calls into it per request:
//!
//! ```text
//! HTTP handlers (cookie / bearer)
//!         │
//!         ▼
//! ┌──────────────────────────────────────┐
//! │            CoreServices              │
//! │  AccountService  EndpointPoolService │
//! │  ApiTokenService PoolTypeRegistry    │
//! └──────────────────┬───────────────────┘
//!                    ▼
//!        Repositories (persistence port)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let services = CoreServicesBuilder::new()
//!     .with_registry(Arc::new(PoolTypeRegistry::load_or_fallback(None)))
//!     .with_user_repo(users)
//!     .with_session_repo(sessions)
//!     .with_pool_repo(pools)
//!     .with_token_repo(tokens)
//!     .build()?;
//!
//! let session = services.accounts.login("a@example.com", "secret123").await?;
//! ```

use std::sync::Arc;

use crate::registry::PoolTypeRegistry;
use crate::repository::{
    ApiTokenRepository, EndpointPoolRepository, SessionRepository, UserRepository,
};
use crate::service::{AccountService, ApiTokenService, CredentialManager, EndpointPoolService};

/// Builder for creating all core services with shared dependencies
pub struct CoreServicesBuilder {
    registry: Option<Arc<PoolTypeRegistry>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    session_repo: Option<Arc<dyn SessionRepository>>,
    pool_repo: Option<Arc<dyn EndpointPoolRepository>>,
    token_repo: Option<Arc<dyn ApiTokenRepository>>,
    credentials: CredentialManager,
}

impl CoreServicesBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            user_repo: None,
            session_repo: None,
            pool_repo: None,
            token_repo: None,
            credentials: CredentialManager::new(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<PoolTypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn with_session_repo(mut self, repo: Arc<dyn SessionRepository>) -> Self {
        self.session_repo = Some(repo);
        self
    }

    pub fn with_pool_repo(mut self, repo: Arc<dyn EndpointPoolRepository>) -> Self {
        self.pool_repo = Some(repo);
        self
    }

    pub fn with_token_repo(mut self, repo: Arc<dyn ApiTokenRepository>) -> Self {
        self.token_repo = Some(repo);
        self
    }

    pub fn with_credential_manager(mut self, credentials: CredentialManager) -> Self {
        self.credentials = credentials;
        self
    }

    /// Build all core services.
    ///
    /// Every repository is required. A missing registry means an unset one.
    pub fn build(self) -> anyhow::Result<CoreServices> {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(PoolTypeRegistry::unset()));
        let users = self
            .user_repo
            .ok_or_else(|| anyhow::anyhow!("User repository required"))?;
        let sessions = self
            .session_repo
            .ok_or_else(|| anyhow::anyhow!("Session repository required"))?;
        let pools = self
            .pool_repo
            .ok_or_else(|| anyhow::anyhow!("Endpoint pool repository required"))?;
        let tokens = self
            .token_repo
            .ok_or_else(|| anyhow::anyhow!("API token repository required"))?;

        Ok(CoreServices {
            accounts: AccountService::new(users, sessions)
                .with_credential_manager(self.credentials),
            pools: EndpointPoolService::new(pools.clone(), registry.clone()),
            tokens: ApiTokenService::new(tokens, pools),
            registry,
        })
    }
}

impl Default for CoreServicesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all core services
pub struct CoreServices {
    /// Pool type catalog shared with the pool service
    pub registry: Arc<PoolTypeRegistry>,
    /// Registration, login and sessions
    pub accounts: AccountService,
    /// Endpoint pool lifecycle
    pub pools: EndpointPoolService,
    /// Bearer token lifecycle
    pub tokens: ApiTokenService,
}
