//! # AllyHub Core Library
//!
//! Identity, access and endpoint pool logic for AllyHub Center.
//!
//! ## Modules
//!
//! - `domain` - Core entities (User, Session, ApiToken, EndpointPool)
//! - `registry` - Pool type configuration registry
//! - `repository` - Data access traits
//! - `service` - Credential, session, token and pool services
//! - `application` - Service wiring for the request-handling layer
//! - `error` - Error taxonomy surfaced to callers

pub mod application;
pub mod domain;
pub mod error;
pub mod registry;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use domain::*;
pub use error::{CoreError, CoreResult};
pub use repository::*;
pub use service::*;

pub use application::{CoreServices, CoreServicesBuilder};
pub use registry::{ConfigError, PoolTypeRegistry};
