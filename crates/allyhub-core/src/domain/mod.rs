//! Domain entities
//!
//! - `User` - account identity
//! - `Session` - cookie-backed interactive login
//! - `ApiToken` - bearer credential bound to one pool
//! - `EndpointPool` / `EndpointUrl` - the user-visible resource

mod api_token;
pub mod endpoint_pool;
mod session;
mod user;

pub use api_token::*;
pub use endpoint_pool::{
    decode_endpoints, encode_endpoints, AllyHubEndpoints, EndpointMap, EndpointPool, EndpointUrl,
    DEFAULT_POOL_ID, FALLBACK_POOL_TYPE,
};
pub use session::*;
pub use user::*;
