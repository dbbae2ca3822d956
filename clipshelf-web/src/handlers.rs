use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{error, info};

use clipshelf::{workflow, Error, Platform};

use crate::render;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct SubmitForm {
    pub url: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_platform() -> String {
    "youtube".to_string()
}

fn default_category() -> String {
    "Uncategorized".to_string()
}

/// GET / — list all records, or only those matching ?category=X.
pub async fn index(state: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    let result = match query.category.as_deref() {
        Some(category) if !category.is_empty() => state.catalog.list_by_category(category),
        _ => state.catalog.list_all(),
    };

    match result {
        Ok(records) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(render::page(&records)),
        Err(e) => error_response(&e),
    }
}

/// POST / — run the acquisition workflow, then redirect back to the listing.
pub async fn submit(state: web::Data<AppState>, form: web::Form<SubmitForm>) -> impl Responder {
    let platform = Platform::parse(&form.platform);

    match workflow::acquire(&state.config, &state.catalog, &form.url, platform, &form.category)
        .await
    {
        Ok(record) => {
            info!(id = record.id, platform = %record.platform, "acquisition complete");
            redirect_to_index()
        }
        Err(e) => error_response(&e),
    }
}

/// POST /delete/{id} — delete one record by id, then redirect.
pub async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match state.catalog.delete(id) {
        Ok(()) => redirect_to_index(),
        Err(e) => error_response(&e),
    }
}

fn redirect_to_index() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Every workflow or store error surfaces as a plain-text 500; no retries,
/// no partial-success reporting.
fn error_response(e: &Error) -> HttpResponse {
    error!(error = %e, "request failed");
    HttpResponse::InternalServerError()
        .content_type("text/plain; charset=utf-8")
        .body(format!("An error occurred: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use clipshelf::{AppConfig, Catalog, NewClip};
    use std::sync::Arc;

    fn seeded_state(dir: &tempfile::TempDir) -> web::Data<AppState> {
        let catalog = Catalog::open(dir.path().join("videos.db")).unwrap();
        catalog
            .insert(&NewClip {
                title: "song".to_string(),
                media_path: Some(
                    dir.path().join("song.mp3").to_string_lossy().into_owned(),
                ),
                transcript_path: Some(
                    dir.path().join("song.txt").to_string_lossy().into_owned(),
                ),
                transcript: Some("la la la".to_string()),
                platform: "youtube".to_string(),
                category: "music".to_string(),
            })
            .unwrap();
        catalog
            .insert(&NewClip {
                title: "reel".to_string(),
                media_path: Some(
                    dir.path().join("reel.mp4").to_string_lossy().into_owned(),
                ),
                transcript_path: None,
                transcript: None,
                platform: "instagram".to_string(),
                category: "clips".to_string(),
            })
            .unwrap();

        web::Data::new(AppState {
            config: Arc::new(AppConfig {
                downloads_dir: dir.path().join("downloads"),
                ..AppConfig::default()
            }),
            catalog,
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state)
                    .route("/", web::get().to(index))
                    .route("/", web::post().to(submit))
                    .route("/delete/{id}", web::post().to(delete)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_index_lists_all_records() {
        let dir = tempfile::tempdir().unwrap();
        let srv = app!(seeded_state(&dir));

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&srv, req).await;
        assert!(resp.status().is_success());

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("song"));
        assert!(body.contains("reel"));
    }

    #[actix_web::test]
    async fn test_index_filters_by_category() {
        let dir = tempfile::tempdir().unwrap();
        let srv = app!(seeded_state(&dir));

        let req = test::TestRequest::get().uri("/?category=music").to_request();
        let resp = test::call_service(&srv, req).await;
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("song"));
        assert!(!body.contains("reel"));
    }

    #[actix_web::test]
    async fn test_delete_redirects_and_removes_record() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded_state(&dir);
        let srv = app!(state.clone());

        let req = test::TestRequest::post().uri("/delete/1").to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);

        let remaining = state.catalog.list_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "reel");
    }

    #[actix_web::test]
    async fn test_delete_nonexistent_still_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let srv = app!(seeded_state(&dir));

        let req = test::TestRequest::post().uri("/delete/999").to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
    }

    #[actix_web::test]
    async fn test_submit_invalid_url_is_500_with_no_new_record() {
        let dir = tempfile::tempdir().unwrap();
        let state = seeded_state(&dir);
        let srv = app!(state.clone());

        let req = test::TestRequest::post()
            .uri("/")
            .set_form([
                ("url", "not-a-url"),
                ("platform", "youtube"),
                ("category", "music"),
            ])
            .to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );

        assert_eq!(state.catalog.list_all().unwrap().len(), 2);
    }
}
