//! Domain services
//!
//! Business logic that operates on domain entities via repositories.

mod account_service;
mod api_token_service;
mod endpoint_pool_service;
pub mod password;
pub mod secrets;
mod session_manager;
mod token_manager;

pub use account_service::AccountService;
pub use api_token_service::{parse_bearer, ApiAccess, ApiTokenService};
pub use endpoint_pool_service::{EndpointPoolService, EndpointPoolUpdate, NewEndpointPool};
pub use password::{CredentialManager, BCRYPT_COST};
pub use secrets::{constant_time_eq, generate_secret, hash_secret, SECRET_BYTES};
pub use session_manager::SessionManager;
pub use token_manager::ApiTokenManager;
