use sqlx::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::suggestion::{Suggestion, SuggestionStatus};

use super::entities::SuggestionEntity;

const SUGGESTION_COLUMNS: &str = "id, instance_id, question_id, proposed_text, reason, status, \
    admin_response, created_at, updated_at";

pub struct SuggestionRepository {
    pool: SqlitePool,
}

impl SuggestionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        instance_id: i64,
        question_id: i64,
        proposed_text: &str,
        reason: &str,
    ) -> Result<Suggestion> {
        let entity = sqlx::query_as::<_, SuggestionEntity>(&format!(
            "INSERT INTO suggestions (instance_id, question_id, proposed_text, reason) \
             VALUES (?, ?, ?, ?) RETURNING {}",
            SUGGESTION_COLUMNS
        ))
        .bind(instance_id)
        .bind(question_id)
        .bind(proposed_text)
        .bind(reason)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create suggestion: {}", e)))?;

        Ok(entity.into())
    }

    pub async fn get(&self, id: i64) -> Result<Suggestion> {
        let entity = sqlx::query_as::<_, SuggestionEntity>(&format!(
            "SELECT {} FROM suggestions WHERE id = ?",
            SUGGESTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch suggestion: {}", e)))?;

        match entity {
            Some(entity) => Ok(entity.into()),
            None => Err(AppError::NotFound(format!("Suggestion not found: {}", id))),
        }
    }

    pub async fn list_for_instance(&self, instance_id: i64) -> Result<Vec<Suggestion>> {
        let entities = sqlx::query_as::<_, SuggestionEntity>(&format!(
            "SELECT {} FROM suggestions WHERE instance_id = ? ORDER BY created_at DESC",
            SUGGESTION_COLUMNS
        ))
        .bind(instance_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list suggestions: {}", e)))?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: SuggestionStatus,
        admin_response: Option<&str>,
    ) -> Result<Suggestion> {
        let entity = sqlx::query_as::<_, SuggestionEntity>(&format!(
            "UPDATE suggestions SET status = ?, admin_response = COALESCE(?, admin_response), \
             updated_at = datetime('now') WHERE id = ? RETURNING {}",
            SUGGESTION_COLUMNS
        ))
        .bind(status.as_str())
        .bind(admin_response)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update suggestion: {}", e)))?;

        match entity {
            Some(entity) => Ok(entity.into()),
            None => Err(AppError::NotFound(format!("Suggestion not found: {}", id))),
        }
    }

    pub async fn set_response(&self, id: i64, response: &str) -> Result<Suggestion> {
        let entity = sqlx::query_as::<_, SuggestionEntity>(&format!(
            "UPDATE suggestions SET admin_response = ?, updated_at = datetime('now') \
             WHERE id = ? RETURNING {}",
            SUGGESTION_COLUMNS
        ))
        .bind(response)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update suggestion: {}", e)))?;

        match entity {
            Some(entity) => Ok(entity.into()),
            None => Err(AppError::NotFound(format!("Suggestion not found: {}", id))),
        }
    }
}
