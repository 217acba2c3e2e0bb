use actix_web::{get, post, web, HttpResponse};
use serde::Serialize;
use tracing::info;

use crate::domain::error::{AppError, Result};

use super::auth::CurrentUser;
use super::questionnaires::{attach_translations, QuestionView};
use super::AppState;

#[derive(Serialize)]
struct InstanceDetail {
    #[serde(flatten)]
    instance: crate::domain::questionnaire::QuestionnaireInstance,
    questions: Vec<QuestionView>,
}

#[get("/instances/{id}")]
pub async fn get_detail(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let instance = state.instances.get_instance(id).await?;
    if instance.owner_id != user.0 {
        return Err(AppError::Unauthorized(
            "Only the owner can view this instance".to_string(),
        ));
    }

    let questions = state.instances.list_instance_questions(id).await?;
    Ok(HttpResponse::Ok().json(InstanceDetail {
        instance,
        questions: attach_translations(questions),
    }))
}

#[derive(Serialize)]
struct MintedLink {
    token: String,
    link_id: i64,
}

#[post("/instances/{id}/links")]
pub async fn mint_link(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let instance_id = path.into_inner();
    let (token, link) = state.share_links.mint(instance_id, &user.0).await?;

    info!(instance_id, link_id = link.id, "Share link minted");

    Ok(HttpResponse::Created().json(MintedLink {
        token,
        link_id: link.id,
    }))
}

#[post("/links/{id}/revoke")]
pub async fn revoke_link(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let link_id = path.into_inner();
    state.share_links.revoke(link_id, &user.0).await?;

    info!(link_id, "Share link revoked");

    Ok(HttpResponse::NoContent().finish())
}

#[get("/instances/{id}/suggestions")]
pub async fn list_suggestions(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let suggestions = state
        .suggestions
        .list(path.into_inner(), &user.0)
        .await?;
    Ok(HttpResponse::Ok().json(suggestions))
}
