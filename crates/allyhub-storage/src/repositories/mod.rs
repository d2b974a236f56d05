//! Repository implementations using SQLite.

mod api_token_repository;
mod endpoint_pool_repository;
mod session_repository;
mod user_repository;

pub use api_token_repository::SqliteApiTokenRepository;
pub use endpoint_pool_repository::SqliteEndpointPoolRepository;
pub use session_repository::SqliteSessionRepository;
pub use user_repository::SqliteUserRepository;

use allyhub_core::{RepoError, RepoResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::ErrorCode;

/// Format a timestamp for storage.
///
/// Fixed precision keeps lexical order equal to time order.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a stored timestamp.
///
/// Handles both RFC3339 and SQLite's `datetime('now')` format.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return dt.and_utc();
    }

    tracing::warn!(value = %s, "Unparseable timestamp in database");
    DateTime::<Utc>::default()
}

/// Map `rusqlite` failures into [`RepoError`].
pub(crate) trait StorageResultExt<T> {
    fn storage(self) -> RepoResult<T>;
}

impl<T> StorageResultExt<T> for rusqlite::Result<T> {
    fn storage(self) -> RepoResult<T> {
        self.map_err(|e| match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == ErrorCode::ConstraintViolation
                    && (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY) =>
            {
                RepoError::Conflict("record already exists".to_string())
            }
            _ => RepoError::Backend(anyhow::Error::new(e)),
        })
    }
}
