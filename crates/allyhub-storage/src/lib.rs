//! AllyHub Storage Layer
//!
//! SQLite implementation of the core repository traits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  allyhub-core                        │
//! ├──────────────────────────────────────────────────────┤
//! │               Repository Traits                      │
//! │   (UserRepository, EndpointPoolRepository, etc.)     │
//! ├──────────────────────────────────────────────────────┤
//! │            SQLite Implementations                    │
//! │ (SqliteUserRepository, SqliteEndpointPoolRepository) │
//! ├──────────────────────────────────────────────────────┤
//! │                   Database                           │
//! │          (one connection, numbered migrations)       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use allyhub_storage::{Database, SqliteUserRepository, SqliteEndpointPoolRepository};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Database::open(&path)?;
//! let db = Arc::new(Mutex::new(db));
//!
//! let users = SqliteUserRepository::new(db.clone());
//! let pools = SqliteEndpointPoolRepository::new(db.clone());
//! ```

mod database;
mod repositories;

pub use database::Database;
pub use repositories::*;

/// Default database file name.
pub const DATABASE_FILE: &str = "allyhub.db";

/// Get the default database path for the current platform.
pub fn default_database_path() -> Option<std::path::PathBuf> {
    dirs::data_local_dir().map(|p| p.join("allyhub").join(DATABASE_FILE))
}
