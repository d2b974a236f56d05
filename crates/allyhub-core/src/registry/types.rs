//! Pool type configuration document types

use serde::{Deserialize, Serialize};

/// Endpoint template within a pool type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointTemplate {
    /// Logical endpoint name, e.g. `tasks_fetch`
    pub name: String,

    /// HTTP method
    #[serde(default)]
    pub method: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

impl EndpointTemplate {
    pub fn new(
        name: impl Into<String>,
        method: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            description: description.into(),
        }
    }
}

/// One pool type and its ordered endpoint templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTypeConfig {
    pub name: String,

    #[serde(default)]
    pub endpoints: Vec<EndpointTemplate>,
}

/// Root of the pool type configuration file.
///
/// ```yaml
/// pool_types:
///   - name: "AllyHub Desktop App"
///     endpoints:
///       - { name: tasks_fetch, method: GET, description: Fetch all tasks }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfiguration {
    #[serde(default)]
    pub pool_types: Vec<PoolTypeConfig>,
}
