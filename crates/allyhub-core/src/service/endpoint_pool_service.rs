//! Endpoint pool service - per-user pool lifecycle on top of the repository
//!
//! Lifecycle: created from a type template (endpoint names present, URLs
//! empty), configured by the user, updated any number of times, deleted.
//! The pool type is validated once at creation and never changes.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{AllyHubEndpoints, EndpointMap, EndpointPool, EndpointUrl};
use crate::error::{CoreError, CoreResult};
use crate::registry::PoolTypeRegistry;
use crate::repository::EndpointPoolRepository;

/// Input for creating a pool.
#[derive(Debug, Clone, Default)]
pub struct NewEndpointPool {
    pub name: String,
    pub description: String,
    /// `None` or empty selects the registry's default type
    pub pool_type: Option<String>,
}

impl NewEndpointPool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_type(mut self, pool_type: impl Into<String>) -> Self {
        self.pool_type = Some(pool_type.into());
        self
    }
}

/// The mutable part of a pool. Type is deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct EndpointPoolUpdate {
    pub name: String,
    pub description: String,
    pub endpoints: EndpointMap,
}

/// Service for managing endpoint pools
pub struct EndpointPoolService {
    repository: Arc<dyn EndpointPoolRepository>,
    registry: Arc<PoolTypeRegistry>,
}

impl EndpointPoolService {
    /// Create a new EndpointPoolService
    pub fn new(repository: Arc<dyn EndpointPoolRepository>, registry: Arc<PoolTypeRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// Selectable pool types, in configuration order
    pub fn pool_types(&self) -> Vec<String> {
        self.registry.type_names()
    }

    /// Endpoint map seeded from a type's templates, URLs left empty.
    ///
    /// An unknown type yields an empty map.
    pub fn instantiate_from_type(&self, type_name: &str) -> EndpointMap {
        self.registry
            .templates_for(type_name)
            .iter()
            .map(|template| {
                let mut endpoint = EndpointUrl::new("", &template.method);
                if !template.description.is_empty() {
                    endpoint = endpoint.with_description(&template.description);
                }
                (template.name.clone(), endpoint)
            })
            .collect()
    }

    /// Create a pool for `user_id` from its type template
    pub async fn create(&self, user_id: &str, input: NewEndpointPool) -> CoreResult<EndpointPool> {
        if input.name.trim().is_empty() {
            return Err(CoreError::validation("name is required"));
        }

        let pool_type = match input.pool_type {
            Some(t) if !t.is_empty() => t,
            _ => self.registry.default_type().to_string(),
        };
        if !self.registry.is_valid_type(&pool_type) {
            return Err(CoreError::validation(format!(
                "unknown pool type '{}'",
                pool_type
            )));
        }

        let endpoints = self.instantiate_from_type(&pool_type);
        let pool = EndpointPool::new(user_id, input.name, pool_type)
            .with_description(input.description)
            .with_endpoints(endpoints);

        self.repository.create(&pool).await?;

        info!(
            user_id = %pool.user_id,
            pool_id = %pool.id,
            pool_type = %pool.pool_type,
            endpoints = pool.endpoints.len(),
            "[EndpointPoolService] Created pool"
        );
        Ok(pool)
    }

    /// Create the built-in default pool for a user
    pub async fn create_default_pool(&self, user_id: &str) -> CoreResult<EndpointPool> {
        let pool = EndpointPool::default_for(user_id);
        self.repository.create(&pool).await?;
        info!(user_id = %user_id, "[EndpointPoolService] Created default pool");
        Ok(pool)
    }

    /// Get one of the user's pools
    pub async fn get(&self, user_id: &str, pool_id: &str) -> CoreResult<EndpointPool> {
        Ok(self.repository.get(user_id, pool_id).await?)
    }

    /// All of the user's pools, default pools first, then oldest first
    pub async fn list(&self, user_id: &str) -> CoreResult<Vec<EndpointPool>> {
        Ok(self.repository.list_for_user(user_id).await?)
    }

    /// Replace name, description and endpoints of a pool
    pub async fn update(
        &self,
        user_id: &str,
        pool_id: &str,
        update: EndpointPoolUpdate,
    ) -> CoreResult<EndpointPool> {
        if update.name.trim().is_empty() {
            return Err(CoreError::validation("name is required"));
        }

        let mut pool = self.repository.get(user_id, pool_id).await?;
        pool.name = update.name;
        pool.description = update.description;
        pool.endpoints = update.endpoints;
        pool.updated_at = Utc::now();

        self.repository.update(&pool).await?;

        info!(user_id = %user_id, pool_id = %pool_id, "[EndpointPoolService] Updated pool");
        Ok(pool)
    }

    /// Delete a pool. Missing pools are ignored.
    ///
    /// Tokens bound to the pool are left in place and stop authenticating.
    pub async fn delete(&self, user_id: &str, pool_id: &str) -> CoreResult<()> {
        self.repository.delete(user_id, pool_id).await?;
        info!(user_id = %user_id, pool_id = %pool_id, "[EndpointPoolService] Deleted pool");
        Ok(())
    }

    /// A pool's URLs in the AllyHub desktop app format
    pub async fn allyhub_endpoints(
        &self,
        user_id: &str,
        pool_id: &str,
    ) -> CoreResult<AllyHubEndpoints> {
        Ok(self.get(user_id, pool_id).await?.allyhub_endpoints())
    }
}
