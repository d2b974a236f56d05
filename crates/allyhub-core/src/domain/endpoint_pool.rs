//! EndpointPool entity - a user's named set of HTTP endpoint definitions
//!
//! Pools are identified by the composite `(user_id, id)`. Two users may hold
//! pools with the same `id`; every lookup must carry both halves.
//!
//! The endpoint map is persisted as a JSON object in a single text column.
//! [`encode_endpoints`] and [`decode_endpoints`] define that contract.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Pool type used when no configuration is available.
pub const FALLBACK_POOL_TYPE: &str = "AllyHub Desktop App";

/// Id of the built-in default pool.
pub const DEFAULT_POOL_ID: &str = "default";

/// Logical endpoint name (e.g. `tasks_fetch`) to its definition.
pub type EndpointMap = BTreeMap<String, EndpointUrl>;

/// One named endpoint definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EndpointUrl {
    /// Target URL, empty until the user configures it
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// HTTP method (GET, POST, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,

    /// Extra request headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// What the endpoint is for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Read an explicit JSON `null` as the field's zero value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl EndpointUrl {
    /// Create an endpoint with a URL and method
    pub fn new(url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers: None,
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Whether the user has filled in a URL yet
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// A pool of endpoints owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointPool {
    /// Pool id, unique per user only
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Pool type from the configuration registry; immutable after creation
    #[serde(rename = "type")]
    pub pool_type: String,

    /// Endpoint definitions keyed by logical name
    #[serde(default)]
    pub endpoints: EndpointMap,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Default pools sort first in listings
    #[serde(default)]
    pub is_default: bool,
}

impl EndpointPool {
    /// Create a pool with a fresh id and no endpoints
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        pool_type: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: name.into(),
            description: String::new(),
            pool_type: pool_type.into(),
            endpoints: EndpointMap::new(),
            created_at: now,
            updated_at: now,
            is_default: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the endpoint map
    pub fn with_endpoints(mut self, endpoints: EndpointMap) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Override the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Mark as a default pool
    pub fn set_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// The built-in "Default Endpoints" pool pointing at a local AllyHub backend
    pub fn default_for(user_id: impl Into<String>) -> Self {
        let base = "http://localhost:8080/api";
        let endpoints = [
            ("tasks_fetch", "/tasks", "GET", "Fetch all tasks"),
            ("tasks_update", "/tasks", "POST", "Update task status"),
            ("chat_history", "/chat/history", "GET", "Get chat conversation history"),
            ("chat_stream", "/chat/stream", "POST", "Stream chat messages"),
            ("notifications_fetch", "/notifications", "GET", "Fetch notifications"),
            (
                "notifications_status",
                "/notifications/status",
                "POST",
                "Update notification status",
            ),
        ]
        .into_iter()
        .map(|(name, path, method, description)| {
            (
                name.to_string(),
                EndpointUrl::new(format!("{}{}", base, path), method).with_description(description),
            )
        })
        .collect();

        Self::new(user_id, "Default Endpoints", FALLBACK_POOL_TYPE)
            .with_id(DEFAULT_POOL_ID)
            .with_description("Default endpoint configuration for AllyHub")
            .with_endpoints(endpoints)
            .set_default()
    }

    /// URL of a named endpoint, empty if absent
    pub fn url_of(&self, name: &str) -> &str {
        self.endpoints
            .get(name)
            .map(|e| e.url.as_str())
            .unwrap_or("")
    }

    /// The six endpoints the AllyHub desktop app consumes, flattened to URLs
    pub fn allyhub_endpoints(&self) -> AllyHubEndpoints {
        AllyHubEndpoints {
            tasks_fetch: self.url_of("tasks_fetch").to_string(),
            tasks_update: self.url_of("tasks_update").to_string(),
            chat_history: self.url_of("chat_history").to_string(),
            chat_stream: self.url_of("chat_stream").to_string(),
            notifications_fetch: self.url_of("notifications_fetch").to_string(),
            notifications_status: self.url_of("notifications_status").to_string(),
        }
    }
}

/// URL set in the shape the AllyHub desktop app expects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllyHubEndpoints {
    pub tasks_fetch: String,
    pub tasks_update: String,
    pub chat_history: String,
    pub chat_stream: String,
    pub notifications_fetch: String,
    pub notifications_status: String,
}

/// Encode an endpoint map for the text column.
///
/// Always yields a JSON object; an empty map becomes `{}`, never `null` or
/// an empty string.
pub fn encode_endpoints(endpoints: &EndpointMap) -> String {
    serde_json::to_string(endpoints).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to encode endpoint map, storing empty map");
        "{}".to_string()
    })
}

/// Decode an endpoint map from the text column.
///
/// Lenient: empty text or anything that is not a valid endpoint object
/// yields an empty map rather than an error.
pub fn decode_endpoints(raw: &str) -> EndpointMap {
    if raw.trim().is_empty() {
        return EndpointMap::new();
    }
    match serde_json::from_str::<EndpointMap>(raw) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            tracing::warn!(error = %e, "Stored endpoint map is not valid JSON, treating as empty");
            EndpointMap::new()
        }
    }
}
