//! Pool Configuration Registry
//!
//! Catalog of valid pool types and the endpoint templates each one seeds a
//! new pool with. It is read from a YAML file once at startup and then
//! shared read-only (`Arc<PoolTypeRegistry>`) with every service that needs
//! it. There is no in-place mutation; reloading means building a new
//! registry and handing it out again.
//!
//! A registry whose file could not be loaded is *unset*. An unset registry
//! still answers every query, using [`FALLBACK_POOL_TYPE`] as the only known
//! type with no templates, so type validation keeps accepting that type.

mod types;

pub use types::*;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

pub use crate::domain::FALLBACK_POOL_TYPE;

/// Default location of the pool type configuration file.
pub const DEFAULT_POOL_CONFIG_PATH: &str = "config/pool_types.yaml";

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Immutable snapshot of the pool type configuration.
#[derive(Debug, Clone, Default)]
pub struct PoolTypeRegistry {
    config: Option<PoolConfiguration>,
}

impl PoolTypeRegistry {
    /// A registry with no configuration loaded
    pub fn unset() -> Self {
        Self { config: None }
    }

    /// Wrap an already-built configuration
    pub fn from_configuration(config: PoolConfiguration) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// Parse a YAML document
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: PoolConfiguration = serde_yaml::from_str(yaml)?;
        Ok(Self::from_configuration(config))
    }

    /// Read and parse the configuration file.
    ///
    /// `None` reads [`DEFAULT_POOL_CONFIG_PATH`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_POOL_CONFIG_PATH));
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::parse(&yaml)?;

        info!(
            path = %path.display(),
            pool_types = registry.type_names().len(),
            "Loaded pool type configuration"
        );
        Ok(registry)
    }

    /// Load the configuration, falling back to an unset registry on failure.
    ///
    /// Startup never aborts because of a missing or broken config file.
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        match Self::load(path) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = FALLBACK_POOL_TYPE,
                    "Failed to load pool config, using fallback configuration"
                );
                Self::unset()
            }
        }
    }

    /// Whether a configuration was loaded
    pub fn is_loaded(&self) -> bool {
        self.config.is_some()
    }

    /// Pool type names in configuration file order
    pub fn type_names(&self) -> Vec<String> {
        match &self.config {
            Some(config) => config.pool_types.iter().map(|t| t.name.clone()).collect(),
            None => vec![FALLBACK_POOL_TYPE.to_string()],
        }
    }

    /// Endpoint templates of a type; empty when the type is unknown
    pub fn templates_for(&self, type_name: &str) -> &[EndpointTemplate] {
        self.find(type_name)
            .map(|t| t.endpoints.as_slice())
            .unwrap_or(&[])
    }

    /// Exact, case-sensitive type name check
    pub fn is_valid_type(&self, type_name: &str) -> bool {
        match &self.config {
            Some(_) => self.find(type_name).is_some(),
            None => type_name == FALLBACK_POOL_TYPE,
        }
    }

    /// First configured type, or the fallback
    pub fn default_type(&self) -> &str {
        self.config
            .as_ref()
            .and_then(|c| c.pool_types.first())
            .map(|t| t.name.as_str())
            .unwrap_or(FALLBACK_POOL_TYPE)
    }

    fn find(&self, type_name: &str) -> Option<&PoolTypeConfig> {
        self.config
            .as_ref()?
            .pool_types
            .iter()
            .find(|t| t.name == type_name)
    }
}
