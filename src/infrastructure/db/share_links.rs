use sqlx::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::questionnaire::ShareLink;

use super::entities::ShareLinkEntity;

pub struct ShareLinkRepository {
    pool: SqlitePool,
}

impl ShareLinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, instance_id: i64, token_hash: &str) -> Result<ShareLink> {
        let entity = sqlx::query_as::<_, ShareLinkEntity>(
            "INSERT INTO share_links (instance_id, token_hash) VALUES (?, ?) \
             RETURNING id, instance_id, token_hash, revoked, created_at",
        )
        .bind(instance_id)
        .bind(token_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create share link: {}", e)))?;

        Ok(entity.into())
    }

    pub async fn get(&self, id: i64) -> Result<ShareLink> {
        let entity = sqlx::query_as::<_, ShareLinkEntity>(
            "SELECT id, instance_id, token_hash, revoked, created_at FROM share_links \
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch share link: {}", e)))?;

        match entity {
            Some(entity) => Ok(entity.into()),
            None => Err(AppError::NotFound(format!("Share link not found: {}", id))),
        }
    }

    /// Resolve a link by token digest. Revoked links behave exactly
    /// like unknown ones.
    pub async fn find_active_by_hash(&self, token_hash: &str) -> Result<ShareLink> {
        let entity = sqlx::query_as::<_, ShareLinkEntity>(
            "SELECT id, instance_id, token_hash, revoked, created_at FROM share_links \
             WHERE token_hash = ? AND revoked = 0",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch share link: {}", e)))?;

        match entity {
            Some(entity) => Ok(entity.into()),
            None => Err(AppError::NotFound("Share link not found".to_string())),
        }
    }

    pub async fn revoke(&self, id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE share_links SET revoked = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to revoke share link: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Share link not found: {}", id)));
        }
        Ok(())
    }
}
