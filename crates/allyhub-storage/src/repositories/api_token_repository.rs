//! SQLite implementation of ApiTokenRepository.

use std::sync::Arc;

use allyhub_core::{ApiToken, ApiTokenRepository, RepoError, RepoResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::Mutex;

use super::{format_datetime, parse_datetime, StorageResultExt};
use crate::Database;

const SELECT_TOKEN: &str =
    "SELECT id, user_id, pool_id, token_hash, token_hint, name, created, last_used, active FROM api_tokens";

/// SQLite-backed implementation of ApiTokenRepository.
pub struct SqliteApiTokenRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteApiTokenRepository {
    /// Create a new SQLite API token repository.
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn row_to_token(row: &Row<'_>) -> rusqlite::Result<ApiToken> {
        Ok(ApiToken {
            id: row.get(0)?,
            user_id: row.get(1)?,
            pool_id: row.get(2)?,
            token_hash: row.get(3)?,
            token_hint: row.get(4)?,
            name: row.get(5)?,
            created_at: parse_datetime(&row.get::<_, String>(6)?),
            last_used_at: row
                .get::<_, Option<String>>(7)?
                .map(|s| parse_datetime(&s)),
            active: row.get(8)?,
        })
    }

    async fn get_where(&self, clause: &str, value: &str) -> RepoResult<ApiToken> {
        let db = self.db.lock().await;
        db.connection()
            .query_row(
                &format!("{SELECT_TOKEN} WHERE {clause} = ?1"),
                params![value],
                Self::row_to_token,
            )
            .optional()
            .storage()?
            .ok_or(RepoError::NotFound("api token"))
    }
}

#[async_trait]
impl ApiTokenRepository for SqliteApiTokenRepository {
    async fn create(&self, token: &ApiToken) -> RepoResult<()> {
        let db = self.db.lock().await;

        db.connection()
            .execute(
                "INSERT INTO api_tokens (id, user_id, pool_id, token_hash, token_hint, name, created, last_used, active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    token.id,
                    token.user_id,
                    token.pool_id,
                    token.token_hash,
                    token.token_hint,
                    token.name,
                    format_datetime(&token.created_at),
                    token.last_used_at.as_ref().map(format_datetime),
                    token.active,
                ],
            )
            .storage()?;

        tracing::debug!(
            user_id = %token.user_id,
            token_id = %token.id,
            "[ApiTokenRepository] Inserted token"
        );
        Ok(())
    }

    async fn get(&self, id: &str) -> RepoResult<ApiToken> {
        self.get_where("id", id).await
    }

    async fn find_by_hash(&self, token_hash: &str) -> RepoResult<ApiToken> {
        self.get_where("token_hash", token_hash).await
    }

    async fn list_for_user(&self, user_id: &str) -> RepoResult<Vec<ApiToken>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "{SELECT_TOKEN} WHERE user_id = ?1 ORDER BY created DESC"
            ))
            .storage()?;

        let tokens = stmt
            .query_map(params![user_id], Self::row_to_token)
            .storage()?
            .collect::<Result<Vec<_>, _>>()
            .storage()?;

        Ok(tokens)
    }

    async fn update(&self, token: &ApiToken) -> RepoResult<()> {
        let db = self.db.lock().await;

        let rows_affected = db
            .connection()
            .execute(
                "UPDATE api_tokens SET name = ?2, last_used = ?3, active = ?4 WHERE id = ?1",
                params![
                    token.id,
                    token.name,
                    token.last_used_at.as_ref().map(format_datetime),
                    token.active,
                ],
            )
            .storage()?;

        if rows_affected == 0 {
            return Err(RepoError::NotFound("api token"));
        }
        Ok(())
    }

    async fn touch_last_used(&self, id: &str, at: DateTime<Utc>) -> RepoResult<bool> {
        let db = self.db.lock().await;

        let rows_affected = db
            .connection()
            .execute(
                "UPDATE api_tokens SET last_used = ?2 WHERE id = ?1 AND active = 1",
                params![id, format_datetime(&at)],
            )
            .storage()?;

        Ok(rows_affected > 0)
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        let db = self.db.lock().await;

        db.connection()
            .execute("DELETE FROM api_tokens WHERE id = ?1", params![id])
            .storage()?;

        Ok(())
    }
}
