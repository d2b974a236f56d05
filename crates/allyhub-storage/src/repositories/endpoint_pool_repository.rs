//! SQLite implementation of EndpointPoolRepository.
//!
//! Every statement is keyed by `(user_id, id)`. The endpoint map lives in a
//! JSON text column and is decoded leniently on read.

use std::sync::Arc;

use allyhub_core::{
    decode_endpoints, encode_endpoints, EndpointPool, EndpointPoolRepository, RepoError,
    RepoResult,
};
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::Mutex;

use super::{format_datetime, parse_datetime, StorageResultExt};
use crate::Database;

const SELECT_POOL: &str = "SELECT id, user_id, name, description, type, endpoints, created, updated, is_default
     FROM endpoint_pools";

/// SQLite-backed implementation of EndpointPoolRepository.
pub struct SqliteEndpointPoolRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteEndpointPoolRepository {
    /// Create a new SQLite endpoint pool repository.
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn row_to_pool(row: &Row<'_>) -> rusqlite::Result<EndpointPool> {
        let endpoints: Option<String> = row.get(5)?;
        Ok(EndpointPool {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            pool_type: row.get(4)?,
            endpoints: decode_endpoints(endpoints.as_deref().unwrap_or_default()),
            created_at: parse_datetime(&row.get::<_, String>(6)?),
            updated_at: parse_datetime(&row.get::<_, String>(7)?),
            is_default: row.get(8)?,
        })
    }
}

#[async_trait]
impl EndpointPoolRepository for SqliteEndpointPoolRepository {
    async fn create(&self, pool: &EndpointPool) -> RepoResult<()> {
        let db = self.db.lock().await;

        db.connection()
            .execute(
                "INSERT INTO endpoint_pools (id, user_id, name, description, type, endpoints, created, updated, is_default)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    pool.id,
                    pool.user_id,
                    pool.name,
                    pool.description,
                    pool.pool_type,
                    encode_endpoints(&pool.endpoints),
                    format_datetime(&pool.created_at),
                    format_datetime(&pool.updated_at),
                    pool.is_default,
                ],
            )
            .storage()?;

        tracing::debug!(
            user_id = %pool.user_id,
            pool_id = %pool.id,
            "[EndpointPoolRepository] Inserted pool"
        );
        Ok(())
    }

    async fn get(&self, user_id: &str, pool_id: &str) -> RepoResult<EndpointPool> {
        let db = self.db.lock().await;

        db.connection()
            .query_row(
                &format!("{SELECT_POOL} WHERE user_id = ?1 AND id = ?2"),
                params![user_id, pool_id],
                Self::row_to_pool,
            )
            .optional()
            .storage()?
            .ok_or(RepoError::NotFound("endpoint pool"))
    }

    async fn list_for_user(&self, user_id: &str) -> RepoResult<Vec<EndpointPool>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "{SELECT_POOL} WHERE user_id = ?1 ORDER BY is_default DESC, created ASC"
            ))
            .storage()?;

        let pools: Vec<EndpointPool> = stmt
            .query_map(params![user_id], Self::row_to_pool)
            .storage()?
            .filter_map(|row| match row {
                Ok(pool) => Some(pool),
                Err(e) => {
                    tracing::warn!(
                        user_id = %user_id,
                        error = %e,
                        "[EndpointPoolRepository] Skipping unreadable pool row"
                    );
                    None
                }
            })
            .collect();

        tracing::debug!(
            user_id = %user_id,
            count = pools.len(),
            "[EndpointPoolRepository] Listed pools"
        );
        Ok(pools)
    }

    async fn update(&self, pool: &EndpointPool) -> RepoResult<()> {
        let db = self.db.lock().await;

        let rows_affected = db
            .connection()
            .execute(
                "UPDATE endpoint_pools
                 SET name = ?3, description = ?4, type = ?5, endpoints = ?6, updated = ?7, is_default = ?8
                 WHERE user_id = ?1 AND id = ?2",
                params![
                    pool.user_id,
                    pool.id,
                    pool.name,
                    pool.description,
                    pool.pool_type,
                    encode_endpoints(&pool.endpoints),
                    format_datetime(&pool.updated_at),
                    pool.is_default,
                ],
            )
            .storage()?;

        if rows_affected == 0 {
            return Err(RepoError::NotFound("endpoint pool"));
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str, pool_id: &str) -> RepoResult<()> {
        let db = self.db.lock().await;

        db.connection()
            .execute(
                "DELETE FROM endpoint_pools WHERE user_id = ?1 AND id = ?2",
                params![user_id, pool_id],
            )
            .storage()?;

        Ok(())
    }
}
