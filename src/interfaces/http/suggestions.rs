use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::suggestion::SuggestionStatus;

use super::auth::CurrentUser;
use super::AppState;

/// Optional note attached when deciding a suggestion. Clients send `{}`
/// when they have nothing to add.
#[derive(Debug, Deserialize)]
pub struct TriageRequest {
    pub response: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RespondRequest {
    #[validate(length(min = 1, max = 2000))]
    pub response: String,
}

#[post("/suggestions/{id}/approve")]
pub async fn approve(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
    request: web::Json<TriageRequest>,
) -> Result<HttpResponse> {
    let suggestion = state
        .suggestions
        .triage(
            path.into_inner(),
            SuggestionStatus::Approved,
            request.response.as_deref(),
            &user.0,
        )
        .await?;
    Ok(HttpResponse::Ok().json(suggestion))
}

#[post("/suggestions/{id}/reject")]
pub async fn reject(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
    request: web::Json<TriageRequest>,
) -> Result<HttpResponse> {
    let suggestion = state
        .suggestions
        .triage(
            path.into_inner(),
            SuggestionStatus::Rejected,
            request.response.as_deref(),
            &user.0,
        )
        .await?;
    Ok(HttpResponse::Ok().json(suggestion))
}

#[post("/suggestions/{id}/respond")]
pub async fn respond(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
    request: web::Json<RespondRequest>,
) -> Result<HttpResponse> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let suggestion = state
        .suggestions
        .respond(path.into_inner(), &request.response, &user.0)
        .await?;
    Ok(HttpResponse::Ok().json(suggestion))
}
