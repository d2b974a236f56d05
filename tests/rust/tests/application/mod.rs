//! Application service tests
//!
//! Account, pool and token services wired through `CoreServices`.

mod endpoint_pools;
mod scenario;
