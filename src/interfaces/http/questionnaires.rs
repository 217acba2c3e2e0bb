use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::question::QuestionRecord;
use crate::domain::characteristic::TranslatedEnableWhen;
use crate::application::use_cases::condition_translator::translate_context;

use super::auth::CurrentUser;
use super::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UploadRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub csv_text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInstanceRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

/// One question plus its visibility explanation, as served to clients.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    #[serde(flatten)]
    pub question: QuestionRecord,
    pub enable_when_translated: Option<TranslatedEnableWhen>,
}

pub fn attach_translations(questions: Vec<QuestionRecord>) -> Vec<QuestionView> {
    let mut translations = translate_context(&questions);
    questions
        .into_iter()
        .map(|question| {
            let translated = translations.remove(&question.id);
            QuestionView {
                question,
                enable_when_translated: translated,
            }
        })
        .collect()
}

#[post("/questionnaires")]
pub async fn upload(
    state: web::Data<AppState>,
    user: CurrentUser,
    request: web::Json<UploadRequest>,
) -> Result<HttpResponse> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let questions = state.uploader.parse(request.csv_text.as_bytes())?;
    let questionnaire = state
        .questionnaires
        .create_master(&request.title, &user.0, &questions)
        .await?;

    info!(
        questionnaire_id = questionnaire.id,
        questions = questionnaire.question_count,
        "Questionnaire uploaded"
    );

    Ok(HttpResponse::Created().json(questionnaire))
}

#[get("/questionnaires")]
pub async fn list(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse> {
    let masters = state.questionnaires.list_masters(&user.0).await?;
    Ok(HttpResponse::Ok().json(masters))
}

#[derive(Serialize)]
struct QuestionnaireDetail {
    #[serde(flatten)]
    questionnaire: crate::domain::questionnaire::Questionnaire,
    questions: Vec<QuestionView>,
}

#[get("/questionnaires/{id}")]
pub async fn get_detail(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let questionnaire = state.questionnaires.get_master(id).await?;
    if questionnaire.owner_id != user.0 {
        return Err(AppError::Unauthorized(
            "Only the owner can view this questionnaire".to_string(),
        ));
    }

    let questions = state.questionnaires.list_master_questions(id).await?;
    Ok(HttpResponse::Ok().json(QuestionnaireDetail {
        questionnaire,
        questions: attach_translations(questions),
    }))
}

#[post("/questionnaires/{id}/instances")]
pub async fn create_instance(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
    request: web::Json<CreateInstanceRequest>,
) -> Result<HttpResponse> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let master_id = path.into_inner();
    let master = state.questionnaires.get_master(master_id).await?;
    if master.owner_id != user.0 {
        return Err(AppError::Unauthorized(
            "Only the owner can create instances".to_string(),
        ));
    }

    let instance = state
        .instances
        .create_instance(master_id, &request.name, &user.0)
        .await?;
    Ok(HttpResponse::Created().json(instance))
}

#[get("/questionnaires/{id}/instances")]
pub async fn list_instances(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let master_id = path.into_inner();
    let master = state.questionnaires.get_master(master_id).await?;
    if master.owner_id != user.0 {
        return Err(AppError::Unauthorized(
            "Only the owner can list instances".to_string(),
        ));
    }

    let instances = state.instances.list_instances(master_id).await?;
    Ok(HttpResponse::Ok().json(instances))
}
