//! API token service - issue, list, revoke and authenticate bearer tokens
//!
//! A token grants access to exactly one pool of its owner. Authentication
//! re-checks that the pool still exists, so tokens bound to a deleted pool
//! stop working without being deleted themselves.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::secrets::hash_secret;
use super::token_manager::ApiTokenManager;
use crate::domain::{ApiToken, ApiTokenSummary, EndpointPool, IssuedApiToken};
use crate::error::{CoreError, CoreResult};
use crate::repository::{ApiTokenRepository, EndpointPoolRepository, RepoError};

const BEARER_PREFIX: &str = "Bearer ";

/// What a valid bearer token grants.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiAccess {
    pub user_id: String,
    pub token_id: String,
    pub pool: EndpointPool,
}

/// Extract the secret from an `Authorization: Bearer <token>` header value
pub fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Service for managing API tokens
pub struct ApiTokenService {
    tokens: Arc<dyn ApiTokenRepository>,
    pools: Arc<dyn EndpointPoolRepository>,
    manager: ApiTokenManager,
}

impl ApiTokenService {
    pub fn new(tokens: Arc<dyn ApiTokenRepository>, pools: Arc<dyn EndpointPoolRepository>) -> Self {
        Self {
            tokens,
            pools,
            manager: ApiTokenManager::new(),
        }
    }

    /// Issue a token for one of the user's pools.
    ///
    /// The secret is handed out here only; storage keeps its digest.
    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        pool_id: &str,
    ) -> CoreResult<IssuedApiToken> {
        if name.trim().is_empty() {
            return Err(CoreError::validation("name is required"));
        }
        if pool_id.is_empty() {
            return Err(CoreError::validation("pool_id is required"));
        }

        match self.pools.get(user_id, pool_id).await {
            Ok(_) => {}
            Err(RepoError::NotFound(_)) => return Err(CoreError::validation("invalid pool id")),
            Err(e) => return Err(e.into()),
        }

        let issued = self.manager.create_token(user_id, name, pool_id)?;
        self.tokens.create(&issued.token).await?;

        info!(
            user_id = %user_id,
            token_id = %issued.token.id,
            pool_id = %pool_id,
            "[ApiTokenService] Created token"
        );
        Ok(issued)
    }

    /// The user's tokens, newest first, without secrets
    pub async fn list(&self, user_id: &str) -> CoreResult<Vec<ApiTokenSummary>> {
        let tokens = self.tokens.list_for_user(user_id).await?;
        Ok(tokens.iter().map(ApiToken::summary).collect())
    }

    /// Mark a token inactive; it stays listed
    pub async fn deactivate(&self, user_id: &str, token_id: &str) -> CoreResult<ApiTokenSummary> {
        let mut token = self.owned(user_id, token_id).await?;
        if token.active {
            token.active = false;
            self.tokens.update(&token).await?;
            info!(user_id = %user_id, token_id = %token_id, "[ApiTokenService] Deactivated token");
        }
        Ok(token.summary())
    }

    /// Delete one of the user's tokens
    pub async fn delete(&self, user_id: &str, token_id: &str) -> CoreResult<()> {
        self.owned(user_id, token_id).await?;
        self.tokens.delete(token_id).await?;
        info!(user_id = %user_id, token_id = %token_id, "[ApiTokenService] Deleted token");
        Ok(())
    }

    /// Resolve a bearer secret to its owner and pool.
    ///
    /// Unknown, inactive or dangling tokens all yield `InvalidCredentials`.
    pub async fn authenticate(&self, secret: &str) -> CoreResult<ApiAccess> {
        if secret.is_empty() {
            return Err(CoreError::InvalidCredentials);
        }

        let token = match self.tokens.find_by_hash(&hash_secret(secret)).await {
            Ok(token) => token,
            Err(RepoError::NotFound(_)) => return Err(CoreError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !self.manager.validate(secret, &token) {
            debug!(token_id = %token.id, "[ApiTokenService] Rejected token");
            return Err(CoreError::InvalidCredentials);
        }

        let pool_id = self.manager.pool_id_of(&token).to_string();
        let pool = match self.pools.get(&token.user_id, &pool_id).await {
            Ok(pool) => pool,
            Err(RepoError::NotFound(_)) => {
                debug!(
                    token_id = %token.id,
                    pool_id = %pool_id,
                    "[ApiTokenService] Token bound to missing pool"
                );
                return Err(CoreError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        // The stamp only lands on a still-active row, so a revocation that
        // raced this lookup is honored here.
        match self.tokens.touch_last_used(&token.id, Utc::now()).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(token_id = %token.id, "[ApiTokenService] Token revoked during authentication");
                return Err(CoreError::InvalidCredentials);
            }
            Err(e) => {
                warn!(token_id = %token.id, error = %e, "[ApiTokenService] Failed to record token use");
            }
        }

        Ok(ApiAccess {
            user_id: token.user_id,
            token_id: token.id,
            pool,
        })
    }

    async fn owned(&self, user_id: &str, token_id: &str) -> CoreResult<ApiToken> {
        match self.tokens.get(token_id).await {
            Ok(token) if token.user_id == user_id => Ok(token),
            Ok(_) | Err(RepoError::NotFound(_)) => Err(CoreError::NotFound("api token")),
            Err(e) => Err(e.into()),
        }
    }
}
