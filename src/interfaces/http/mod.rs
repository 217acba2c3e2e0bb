use actix_cors::Cors;
use actix_web::{dev::Server, get, web, App, HttpResponse, HttpServer, Responder};
use sqlx::SqlitePool;

use crate::application::{QuestionnaireUploader, ShareLinkService, SuggestionService};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::instances::InstanceRepository;
use crate::infrastructure::db::questionnaires::QuestionnaireRepository;
use crate::infrastructure::db::share_links::ShareLinkRepository;
use crate::infrastructure::db::suggestions::SuggestionRepository;

pub mod auth;
pub mod instances;
pub mod questionnaires;
pub mod shared;
pub mod suggestions;

pub struct AppState {
    pub uploader: QuestionnaireUploader,
    pub questionnaires: QuestionnaireRepository,
    pub instances: InstanceRepository,
    pub share_links: ShareLinkService,
    pub suggestions: SuggestionService,
}

pub fn build_state(pool: SqlitePool, config: &AppConfig) -> AppState {
    AppState {
        uploader: QuestionnaireUploader::new(config.upload.max_questions),
        questionnaires: QuestionnaireRepository::new(pool.clone()),
        instances: InstanceRepository::new(pool.clone()),
        share_links: ShareLinkService::new(
            ShareLinkRepository::new(pool.clone()),
            InstanceRepository::new(pool.clone()),
        ),
        suggestions: SuggestionService::new(
            SuggestionRepository::new(pool.clone()),
            InstanceRepository::new(pool),
        ),
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Register every API route under /api. Shared between the server and
/// the handler tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health)
            .service(questionnaires::upload)
            .service(questionnaires::list)
            .service(questionnaires::get_detail)
            .service(questionnaires::create_instance)
            .service(questionnaires::list_instances)
            .service(instances::get_detail)
            .service(instances::mint_link)
            .service(instances::revoke_link)
            .service(instances::list_suggestions)
            .service(shared::view)
            .service(shared::submit_suggestion)
            .service(suggestions::approve)
            .service(suggestions::reject)
            .service(suggestions::respond),
    );
}

pub fn start_server(config: &AppConfig, pool: SqlitePool) -> std::io::Result<Server> {
    let state = web::Data::new(build_state(pool, config));

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure_api)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::connection::init_memory_db;
    use actix_web::http::StatusCode;
    use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
    use serde_json::{json, Value};

    const UPLOAD_CSV: &str = "\
Id,Section,Page,ItemType,Question,Option,Characteristic,Required,EnableWhen,HasHelper,HelperType,HelperName,HelperValue
q1,General,1,radio,Do you smoke?,Yes,smoker,TRUE,,FALSE,,,
q1,General,1,radio,Do you smoke?,No,non-smoker,TRUE,,FALSE,,,
q2,General,1,text,What do you smoke?,,,FALSE,(smoker=true),FALSE,,,";

    macro_rules! test_app {
        () => {{
            let pool = init_memory_db().await.unwrap();
            let state = web::Data::new(build_state(pool, &AppConfig::default()));
            init_service(App::new().app_data(state).configure(configure_api)).await
        }};
    }

    fn as_admin(request: TestRequest) -> TestRequest {
        request.insert_header(("X-User-Id", "admin-1"))
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test_app!();
        let response = call_service(&app, TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_upload_requires_identity() {
        let app = test_app!();
        let response = call_service(
            &app,
            TestRequest::post()
                .uri("/api/questionnaires")
                .set_json(json!({ "title": "T", "csv_text": UPLOAD_CSV }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_invalid_upload_is_bad_request() {
        let app = test_app!();
        let csv = "Id,Section,Page,ItemType,Question,Option,Characteristic,Required\nq1,G,1,slider,Pain?,,,FALSE";
        let response = call_service(
            &app,
            as_admin(TestRequest::post().uri("/api/questionnaires"))
                .set_json(json!({ "title": "T", "csv_text": csv }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_full_feedback_flow() {
        let app = test_app!();

        // Upload a master.
        let response = call_service(
            &app,
            as_admin(TestRequest::post().uri("/api/questionnaires"))
                .set_json(json!({ "title": "Pre-op", "csv_text": UPLOAD_CSV }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let master: Value = read_body_json(response).await;
        let master_id = master["id"].as_i64().unwrap();
        assert_eq!(master["question_count"], 2);

        // Master detail carries the translated condition.
        let response = call_service(
            &app,
            as_admin(TestRequest::get().uri(&format!("/api/questionnaires/{}", master_id)))
                .to_request(),
        )
        .await;
        let detail: Value = read_body_json(response).await;
        let translated = &detail["questions"][1]["enable_when_translated"];
        assert_eq!(
            translated["summary"],
            "Shown when: Do you smoke? is answered \"Yes\""
        );

        // Clone an instance and mint a share link.
        let response = call_service(
            &app,
            as_admin(TestRequest::post().uri(&format!(
                "/api/questionnaires/{}/instances",
                master_id
            )))
            .set_json(json!({ "name": "Ward A" }))
            .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let instance: Value = read_body_json(response).await;
        let instance_id = instance["id"].as_i64().unwrap();

        let response = call_service(
            &app,
            as_admin(TestRequest::post().uri(&format!("/api/instances/{}/links", instance_id)))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let minted: Value = read_body_json(response).await;
        let token = minted["token"].as_str().unwrap().to_string();

        // Trust user views through the link, no identity header.
        let response = call_service(
            &app,
            TestRequest::get()
                .uri(&format!("/api/shared/{}", token))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let view: Value = read_body_json(response).await;
        assert_eq!(view["instance_name"], "Ward A");
        let question_id = view["questions"][0]["id"].as_i64().unwrap();

        // Trust user submits a suggestion.
        let response = call_service(
            &app,
            TestRequest::post()
                .uri(&format!("/api/shared/{}/suggestions", token))
                .set_json(json!({
                    "question_id": question_id,
                    "proposed_text": "Do you currently smoke?",
                    "reason": "Present tense is clearer"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let suggestion: Value = read_body_json(response).await;
        let suggestion_id = suggestion["id"].as_i64().unwrap();
        assert_eq!(suggestion["status"], "pending");

        // Owner triages it.
        let response = call_service(
            &app,
            as_admin(TestRequest::post().uri(&format!(
                "/api/suggestions/{}/approve",
                suggestion_id
            )))
            .set_json(json!({ "response": "Good catch" }))
            .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let approved: Value = read_body_json(response).await;
        assert_eq!(approved["status"], "approved");
        assert_eq!(approved["admin_response"], "Good catch");

        // Revoking the link closes the shared view.
        let link_id = minted["link_id"].as_i64().unwrap();
        let response = call_service(
            &app,
            as_admin(TestRequest::post().uri(&format!("/api/links/{}/revoke", link_id)))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = call_service(
            &app,
            TestRequest::get()
                .uri(&format!("/api/shared/{}", token))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // A second approve attempt fails.
        let response = call_service(
            &app,
            as_admin(TestRequest::post().uri(&format!(
                "/api/suggestions/{}/approve",
                suggestion_id
            )))
            .set_json(json!({}))
            .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_foreign_owner_cannot_view_master() {
        let app = test_app!();

        let response = call_service(
            &app,
            as_admin(TestRequest::post().uri("/api/questionnaires"))
                .set_json(json!({ "title": "Mine", "csv_text": UPLOAD_CSV }))
                .to_request(),
        )
        .await;
        let master: Value = read_body_json(response).await;
        let master_id = master["id"].as_i64().unwrap();

        let response = call_service(
            &app,
            TestRequest::get()
                .uri(&format!("/api/questionnaires/{}", master_id))
                .insert_header(("X-User-Id", "someone-else"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
