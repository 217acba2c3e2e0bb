use sqlx::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::question::QuestionRecord;
use crate::domain::questionnaire::QuestionnaireInstance;

use super::entities::{InstanceEntity, QuestionEntity};

pub struct InstanceRepository {
    pool: SqlitePool,
}

impl InstanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an instance and clone the master's questions into it, in
    /// one transaction. Clones keep order and content but get new ids.
    pub async fn create_instance(
        &self,
        master_id: i64,
        name: &str,
        owner_id: &str,
    ) -> Result<QuestionnaireInstance> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to open transaction: {}", e))
        })?;

        let instance_id: i64 = sqlx::query_scalar(
            "INSERT INTO instances (master_id, name, owner_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(master_id)
        .bind(name)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create instance: {}", e)))?;

        sqlx::query(
            "INSERT INTO questions (instance_id, position, question_key, section, page, item_type, \
             question, answer_options, characteristic, required, enable_when, has_helper, \
             helper_type, helper_name, helper_value) \
             SELECT ?, position, question_key, section, page, item_type, question, answer_options, \
             characteristic, required, enable_when, has_helper, helper_type, helper_name, helper_value \
             FROM questions WHERE master_id = ? ORDER BY position",
        )
        .bind(instance_id)
        .bind(master_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to clone questions: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit instance: {}", e)))?;

        self.get_instance(instance_id).await
    }

    pub async fn get_instance(&self, id: i64) -> Result<QuestionnaireInstance> {
        let entity = sqlx::query_as::<_, InstanceEntity>(
            "SELECT id, master_id, name, owner_id, created_at FROM instances WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch instance: {}", e)))?;

        match entity {
            Some(entity) => Ok(entity.into()),
            None => Err(AppError::NotFound(format!("Instance not found: {}", id))),
        }
    }

    pub async fn list_instances(&self, master_id: i64) -> Result<Vec<QuestionnaireInstance>> {
        let entities = sqlx::query_as::<_, InstanceEntity>(
            "SELECT id, master_id, name, owner_id, created_at FROM instances \
             WHERE master_id = ? ORDER BY created_at DESC",
        )
        .bind(master_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list instances: {}", e)))?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    pub async fn list_instance_questions(&self, instance_id: i64) -> Result<Vec<QuestionRecord>> {
        let entities = sqlx::query_as::<_, QuestionEntity>(
            "SELECT * FROM questions WHERE instance_id = ? ORDER BY position",
        )
        .bind(instance_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list instance questions: {}", e)))?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
