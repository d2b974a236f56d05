//! SQLite implementation of SessionRepository.

use std::sync::Arc;

use allyhub_core::{RepoError, RepoResult, Session, SessionRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use tokio::sync::Mutex;

use super::{format_datetime, parse_datetime, StorageResultExt};
use crate::Database;

/// SQLite-backed implementation of SessionRepository.
pub struct SqliteSessionRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteSessionRepository {
    /// Create a new SQLite session repository.
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, session: &Session) -> RepoResult<()> {
        let db = self.db.lock().await;

        db.connection()
            .execute(
                "INSERT INTO sessions (id, user_id, created, expires) VALUES (?1, ?2, ?3, ?4)",
                params![
                    session.id,
                    session.user_id,
                    format_datetime(&session.created_at),
                    format_datetime(&session.expires_at),
                ],
            )
            .storage()?;

        Ok(())
    }

    async fn get(&self, id: &str) -> RepoResult<Session> {
        let db = self.db.lock().await;

        db.connection()
            .query_row(
                "SELECT id, user_id, created, expires FROM sessions WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Session {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        created_at: parse_datetime(&row.get::<_, String>(2)?),
                        expires_at: parse_datetime(&row.get::<_, String>(3)?),
                    })
                },
            )
            .optional()
            .storage()?
            .ok_or(RepoError::NotFound("session"))
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        let db = self.db.lock().await;

        db.connection()
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])
            .storage()?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let db = self.db.lock().await;

        let removed = db
            .connection()
            .execute(
                "DELETE FROM sessions WHERE expires <= ?1",
                params![format_datetime(&now)],
            )
            .storage()?;

        tracing::debug!(removed, "[SessionRepository] Deleted expired sessions");
        Ok(removed as u64)
    }
}
