// Respondent feedback triage. Suggestions arrive through share links
// and move pending -> approved/rejected exactly once; only the
// instance owner may triage.

use crate::domain::error::{AppError, Result};
use crate::domain::suggestion::{Suggestion, SuggestionInput, SuggestionStatus};
use crate::infrastructure::db::instances::InstanceRepository;
use crate::infrastructure::db::suggestions::SuggestionRepository;

pub struct SuggestionService {
    suggestions: SuggestionRepository,
    instances: InstanceRepository,
}

impl SuggestionService {
    pub fn new(suggestions: SuggestionRepository, instances: InstanceRepository) -> Self {
        Self {
            suggestions,
            instances,
        }
    }

    /// Submit a suggestion against an instance question. The caller has
    /// already been admitted through a share link; the question must
    /// belong to the instance the link points at.
    pub async fn submit(&self, instance_id: i64, input: &SuggestionInput) -> Result<Suggestion> {
        let questions = self.instances.list_instance_questions(instance_id).await?;
        if !questions.iter().any(|q| q.id == input.question_id) {
            return Err(AppError::ValidationError(format!(
                "Question {} does not belong to instance {}",
                input.question_id, instance_id
            )));
        }

        self.suggestions
            .create(
                instance_id,
                input.question_id,
                &input.proposed_text,
                &input.reason,
            )
            .await
    }

    pub async fn list(&self, instance_id: i64, caller_id: &str) -> Result<Vec<Suggestion>> {
        self.check_owner(instance_id, caller_id).await?;
        self.suggestions.list_for_instance(instance_id).await
    }

    /// Approve or reject a pending suggestion, optionally with a
    /// response note. Re-triaging a decided suggestion is rejected.
    pub async fn triage(
        &self,
        suggestion_id: i64,
        status: SuggestionStatus,
        response: Option<&str>,
        caller_id: &str,
    ) -> Result<Suggestion> {
        if status == SuggestionStatus::Pending {
            return Err(AppError::ValidationError(
                "Cannot triage a suggestion back to pending".to_string(),
            ));
        }

        let suggestion = self.suggestions.get(suggestion_id).await?;
        self.check_owner(suggestion.instance_id, caller_id).await?;

        if suggestion.status != SuggestionStatus::Pending {
            return Err(AppError::ValidationError(format!(
                "Suggestion {} is already {}",
                suggestion_id,
                suggestion.status.as_str()
            )));
        }

        self.suggestions
            .update_status(suggestion_id, status, response)
            .await
    }

    /// Attach or replace the admin response without changing status.
    pub async fn respond(
        &self,
        suggestion_id: i64,
        response: &str,
        caller_id: &str,
    ) -> Result<Suggestion> {
        let suggestion = self.suggestions.get(suggestion_id).await?;
        self.check_owner(suggestion.instance_id, caller_id).await?;
        self.suggestions.set_response(suggestion_id, response).await
    }

    async fn check_owner(&self, instance_id: i64, caller_id: &str) -> Result<()> {
        let instance = self.instances.get_instance(instance_id).await?;
        if instance.owner_id != caller_id {
            return Err(AppError::Unauthorized(
                "Only the owner can manage suggestions".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::question::ParsedQuestion;
    use crate::infrastructure::db::connection::init_memory_db;
    use crate::infrastructure::db::questionnaires::QuestionnaireRepository;
    use sqlx::SqlitePool;

    async fn seed(pool: &SqlitePool) -> (SuggestionService, i64, i64) {
        let question = ParsedQuestion {
            id: "q1".to_string(),
            section: "General".to_string(),
            page: "1".to_string(),
            item_type: "text".to_string(),
            question: "Your name?".to_string(),
            options: Vec::new(),
            characteristic: None,
            required: false,
            enable_when: None,
            enable_when_raw: None,
            has_helper: false,
            helper_type: None,
            helper_name: None,
            helper_value: None,
        };
        let master = QuestionnaireRepository::new(pool.clone())
            .create_master("Master", "admin-1", &[question])
            .await
            .unwrap();
        let instances = InstanceRepository::new(pool.clone());
        let instance = instances
            .create_instance(master.id, "Ward A", "admin-1")
            .await
            .unwrap();
        let question_id = instances
            .list_instance_questions(instance.id)
            .await
            .unwrap()[0]
            .id;

        let service = SuggestionService::new(
            SuggestionRepository::new(pool.clone()),
            InstanceRepository::new(pool.clone()),
        );
        (service, instance.id, question_id)
    }

    fn input(question_id: i64) -> SuggestionInput {
        SuggestionInput {
            question_id,
            proposed_text: "Plainer wording".to_string(),
            reason: "Too clinical".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_and_approve() {
        let pool = init_memory_db().await.unwrap();
        let (service, instance_id, question_id) = seed(&pool).await;

        let suggestion = service.submit(instance_id, &input(question_id)).await.unwrap();
        assert_eq!(suggestion.status, SuggestionStatus::Pending);

        let approved = service
            .triage(suggestion.id, SuggestionStatus::Approved, Some("Done"), "admin-1")
            .await
            .unwrap();
        assert_eq!(approved.status, SuggestionStatus::Approved);
        assert_eq!(approved.admin_response.as_deref(), Some("Done"));
    }

    #[tokio::test]
    async fn test_submit_rejects_foreign_question() {
        let pool = init_memory_db().await.unwrap();
        let (service, instance_id, _) = seed(&pool).await;

        let err = service.submit(instance_id, &input(9999)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_decided_suggestion_cannot_be_retriaged() {
        let pool = init_memory_db().await.unwrap();
        let (service, instance_id, question_id) = seed(&pool).await;

        let suggestion = service.submit(instance_id, &input(question_id)).await.unwrap();
        service
            .triage(suggestion.id, SuggestionStatus::Rejected, None, "admin-1")
            .await
            .unwrap();

        let err = service
            .triage(suggestion.id, SuggestionStatus::Approved, None, "admin-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_only_owner_triages() {
        let pool = init_memory_db().await.unwrap();
        let (service, instance_id, question_id) = seed(&pool).await;

        let suggestion = service.submit(instance_id, &input(question_id)).await.unwrap();
        let err = service
            .triage(suggestion.id, SuggestionStatus::Approved, None, "stranger")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_triage_back_to_pending_rejected() {
        let pool = init_memory_db().await.unwrap();
        let (service, instance_id, question_id) = seed(&pool).await;

        let suggestion = service.submit(instance_id, &input(question_id)).await.unwrap();
        let err = service
            .triage(suggestion.id, SuggestionStatus::Pending, None, "admin-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
