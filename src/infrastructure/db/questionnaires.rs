use sqlx::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::question::{ParsedQuestion, QuestionRecord};
use crate::domain::questionnaire::Questionnaire;

use super::entities::{QuestionEntity, QuestionnaireEntity};

const QUESTIONNAIRE_COLUMNS: &str = "id, title, owner_id, \
    (SELECT COUNT(*) FROM questions WHERE questions.master_id = questionnaires.id) AS question_count, \
    created_at";

pub struct QuestionnaireRepository {
    pool: SqlitePool,
}

impl QuestionnaireRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a master and all of its questions in one transaction.
    /// Nothing is written when any insert fails.
    pub async fn create_master(
        &self,
        title: &str,
        owner_id: &str,
        questions: &[ParsedQuestion],
    ) -> Result<Questionnaire> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to open transaction: {}", e))
        })?;

        let master_id: i64 = sqlx::query_scalar(
            "INSERT INTO questionnaires (title, owner_id) VALUES (?, ?) RETURNING id",
        )
        .bind(title)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create questionnaire: {}", e)))?;

        for (position, question) in questions.iter().enumerate() {
            sqlx::query(
                "INSERT INTO questions (master_id, position, question_key, section, page, item_type, \
                 question, answer_options, characteristic, required, enable_when, has_helper, \
                 helper_type, helper_name, helper_value) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(master_id)
            .bind(position as i64)
            .bind(&question.id)
            .bind(&question.section)
            .bind(&question.page)
            .bind(&question.item_type)
            .bind(&question.question)
            .bind(question.answer_options_field())
            .bind(question.characteristic_field())
            .bind(question.required)
            .bind(&question.enable_when_raw)
            .bind(question.has_helper)
            .bind(&question.helper_type)
            .bind(&question.helper_name)
            .bind(&question.helper_value)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to insert question {}: {}",
                    question.id, e
                ))
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to commit questionnaire: {}", e))
        })?;

        self.get_master(master_id).await
    }

    pub async fn get_master(&self, id: i64) -> Result<Questionnaire> {
        let entity = sqlx::query_as::<_, QuestionnaireEntity>(&format!(
            "SELECT {} FROM questionnaires WHERE id = ?",
            QUESTIONNAIRE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch questionnaire: {}", e)))?;

        match entity {
            Some(entity) => Ok(entity.into()),
            None => Err(AppError::NotFound(format!("Questionnaire not found: {}", id))),
        }
    }

    pub async fn list_masters(&self, owner_id: &str) -> Result<Vec<Questionnaire>> {
        let entities = sqlx::query_as::<_, QuestionnaireEntity>(&format!(
            "SELECT {} FROM questionnaires WHERE owner_id = ? ORDER BY created_at DESC",
            QUESTIONNAIRE_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list questionnaires: {}", e)))?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    pub async fn list_master_questions(&self, master_id: i64) -> Result<Vec<QuestionRecord>> {
        let entities = sqlx::query_as::<_, QuestionEntity>(
            "SELECT * FROM questions WHERE master_id = ? ORDER BY position",
        )
        .bind(master_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list questions: {}", e)))?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::question::QuestionOption;
    use crate::infrastructure::db::connection::init_memory_db;

    fn sample_question(id: &str) -> ParsedQuestion {
        ParsedQuestion {
            id: id.to_string(),
            section: "General".to_string(),
            page: "1".to_string(),
            item_type: "radio".to_string(),
            question: "Do you smoke?".to_string(),
            options: vec![
                QuestionOption {
                    value: "Yes".to_string(),
                    characteristic: Some("smoker".to_string()),
                },
                QuestionOption {
                    value: "No".to_string(),
                    characteristic: Some("non-smoker".to_string()),
                },
            ],
            characteristic: None,
            required: true,
            enable_when: None,
            enable_when_raw: Some("(adult=true)".to_string()),
            has_helper: false,
            helper_type: None,
            helper_name: None,
            helper_value: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_master() {
        let pool = init_memory_db().await.unwrap();
        let repo = QuestionnaireRepository::new(pool);

        let master = repo
            .create_master("Pre-op assessment", "admin-1", &[sample_question("q1")])
            .await
            .unwrap();

        assert_eq!(master.title, "Pre-op assessment");
        assert_eq!(master.owner_id, "admin-1");
        assert_eq!(master.question_count, 1);

        let questions = repo.list_master_questions(master.id).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_key, "q1");
        assert_eq!(questions[0].answer_options.as_deref(), Some("Yes|No"));
        assert_eq!(
            questions[0].characteristic.as_deref(),
            Some("smoker|non-smoker")
        );
        assert_eq!(questions[0].enable_when.as_deref(), Some("(adult=true)"));
    }

    #[tokio::test]
    async fn test_questions_ordered_by_position() {
        let pool = init_memory_db().await.unwrap();
        let repo = QuestionnaireRepository::new(pool);

        let master = repo
            .create_master(
                "Ordered",
                "admin-1",
                &[sample_question("first"), sample_question("second")],
            )
            .await
            .unwrap();

        let questions = repo.list_master_questions(master.id).await.unwrap();
        assert_eq!(questions[0].question_key, "first");
        assert_eq!(questions[1].question_key, "second");
    }

    #[tokio::test]
    async fn test_missing_master_is_not_found() {
        let pool = init_memory_db().await.unwrap();
        let repo = QuestionnaireRepository::new(pool);

        let err = repo.get_master(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_masters_scoped_to_owner() {
        let pool = init_memory_db().await.unwrap();
        let repo = QuestionnaireRepository::new(pool);

        repo.create_master("Mine", "admin-1", &[]).await.unwrap();
        repo.create_master("Theirs", "admin-2", &[]).await.unwrap();

        let masters = repo.list_masters("admin-1").await.unwrap();
        assert_eq!(masters.len(), 1);
        assert_eq!(masters[0].title, "Mine");
    }
}
