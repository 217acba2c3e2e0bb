// Trust-user surface: everything here is reached through a share link
// token instead of a signed-in user.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::suggestion::SuggestionInput;

use super::questionnaires::{attach_translations, QuestionView};
use super::AppState;

#[derive(Serialize)]
struct SharedView {
    instance_name: String,
    questions: Vec<QuestionView>,
}

#[get("/shared/{token}")]
pub async fn view(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let instance = state.share_links.resolve(&path.into_inner()).await?;
    let questions = state.instances.list_instance_questions(instance.id).await?;

    Ok(HttpResponse::Ok().json(SharedView {
        instance_name: instance.name,
        questions: attach_translations(questions),
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitSuggestionRequest {
    pub question_id: i64,
    #[validate(length(min = 1, max = 2000))]
    pub proposed_text: String,
    #[validate(length(min = 1, max = 2000))]
    pub reason: String,
}

#[post("/shared/{token}/suggestions")]
pub async fn submit_suggestion(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<SubmitSuggestionRequest>,
) -> Result<HttpResponse> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let instance = state.share_links.resolve(&path.into_inner()).await?;
    let suggestion = state
        .suggestions
        .submit(
            instance.id,
            &SuggestionInput {
                question_id: request.question_id,
                proposed_text: request.proposed_text.clone(),
                reason: request.reason.clone(),
            },
        )
        .await?;

    info!(
        instance_id = instance.id,
        suggestion_id = suggestion.id,
        "Suggestion submitted"
    );

    Ok(HttpResponse::Created().json(suggestion))
}
