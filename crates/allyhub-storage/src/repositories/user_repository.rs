//! SQLite implementation of UserRepository.

use std::sync::Arc;

use allyhub_core::{RepoError, RepoResult, User, UserRepository};
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::Mutex;

use super::{format_datetime, parse_datetime, StorageResultExt};
use crate::Database;

const SELECT_USER: &str = "SELECT id, email, password, created, updated FROM users";

/// SQLite-backed implementation of UserRepository.
pub struct SqliteUserRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteUserRepository {
    /// Create a new SQLite user repository.
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            created_at: parse_datetime(&row.get::<_, String>(3)?),
            updated_at: parse_datetime(&row.get::<_, String>(4)?),
        })
    }

    async fn get_where(&self, clause: &str, value: &str) -> RepoResult<User> {
        let db = self.db.lock().await;
        db.connection()
            .query_row(
                &format!("{SELECT_USER} WHERE {clause} = ?1"),
                params![value],
                Self::row_to_user,
            )
            .optional()
            .storage()?
            .ok_or(RepoError::NotFound("user"))
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> RepoResult<()> {
        let db = self.db.lock().await;

        db.connection()
            .execute(
                "INSERT INTO users (id, email, password, created, updated) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.id,
                    user.email,
                    user.password_hash,
                    format_datetime(&user.created_at),
                    format_datetime(&user.updated_at),
                ],
            )
            .storage()
            .map_err(|e| match e {
                RepoError::Conflict(_) => RepoError::Conflict("user already exists".to_string()),
                other => other,
            })?;

        tracing::debug!(user_id = %user.id, "[UserRepository] Inserted user");
        Ok(())
    }

    async fn get(&self, id: &str) -> RepoResult<User> {
        self.get_where("id", id).await
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<User> {
        self.get_where("email", email).await
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let db = self.db.lock().await;

        let rows_affected = db
            .connection()
            .execute(
                "UPDATE users SET email = ?2, password = ?3, updated = ?4 WHERE id = ?1",
                params![
                    user.id,
                    user.email,
                    user.password_hash,
                    format_datetime(&user.updated_at),
                ],
            )
            .storage()
            .map_err(|e| match e {
                RepoError::Conflict(_) => RepoError::Conflict("email already in use".to_string()),
                other => other,
            })?;

        if rows_affected == 0 {
            return Err(RepoError::NotFound("user"));
        }
        Ok(())
    }
}
