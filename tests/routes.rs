use std::time::Duration;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpRequest, HttpResponse, web};
use actix_web_flash_messages::{FlashMessagesFramework, Level, storage::CookieMessageStore};
use tera::Tera;

use school_admin::client::ApiClient;
use school_admin::domain::auth::AuthenticatedUser;
use school_admin::domain::types::UserId;
use school_admin::middleware::{RedirectUnauthorized, remember_user};
use school_admin::models::config::ServerConfig;
use school_admin::routes::main::show_index;
use school_admin::routes::students::show_students;
use school_admin::routes::{alert_level_to_str, page_error};
use school_admin::services::ServiceError;

const DEAD_BACKEND: &str = "http://127.0.0.1:9";

fn server_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        templates_dir: "templates/**/*".to_string(),
        secret: "x".repeat(64),
        backend_url: DEAD_BACKEND.to_string(),
        request_timeout_secs: 1,
        items_per_page: 20,
        currency: "KSh".to_string(),
        max_photo_bytes: 1024,
    }
}

fn bursar() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId::new(1).unwrap(),
        email: "bursar@example.com".to_string(),
        name: "Bursar".to_string(),
        roles: vec!["ADMIN".to_string()],
        school_name: Some("Hillside".to_string()),
        branch_id: None,
        token: "token-1".to_string(),
    }
}

fn flash_framework(key: &Key) -> FlashMessagesFramework {
    FlashMessagesFramework::builder(CookieMessageStore::builder(key.clone()).build()).build()
}

#[test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn pages_without_a_session_redirect_to_sign_in() {
    let key = Key::from(&[7; 64]);
    let client = ApiClient::new(DEAD_BACKEND, Duration::from_secs(1)).unwrap();

    let app = actix_web::test::init_service(
        App::new()
            .wrap(flash_framework(&key))
            .wrap(IdentityMiddleware::default())
            .wrap(SessionMiddleware::new(CookieSessionStore::default(), key))
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_students),
            )
            .app_data(web::Data::new(client)),
    )
    .await;

    let req = actix_web::test::TestRequest::get()
        .uri("/students")
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/auth");
}

#[actix_web::test]
async fn backend_failures_on_page_load_flash_and_redirect_to_the_fallback() {
    let key = Key::from(&[7; 64]);
    let app = actix_web::test::init_service(
        App::new()
            .wrap(flash_framework(&key))
            .route(
                "/backend",
                web::get().to(|| async {
                    page_error(
                        ServiceError::Backend("Term is closed".to_string()),
                        "invoices",
                        "/",
                    )
                }),
            )
            .route(
                "/form",
                web::get().to(|| async {
                    page_error(
                        ServiceError::Form("Pick a student".to_string()),
                        "invoice",
                        "/invoices",
                    )
                }),
            )
            .route(
                "/internal",
                web::get().to(|| async {
                    page_error(ServiceError::Internal("io".to_string()), "invoices", "/")
                }),
            ),
    )
    .await;

    for (uri, location) in [("/backend", "/"), ("/form", "/invoices")] {
        let req = actix_web::test::TestRequest::get().uri(uri).to_request();
        let resp = actix_web::test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), location);
        assert!(
            resp.headers().get(header::SET_COOKIE).is_some(),
            "{uri} should carry a flash message"
        );
    }

    let req = actix_web::test::TestRequest::get()
        .uri("/internal")
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn dashboard_renders_in_place_when_the_backend_is_down() {
    let key = Key::from(&[7; 64]);
    let config = server_config();
    let client = ApiClient::new(&config.backend_url, config.request_timeout()).unwrap();
    let tera = Tera::new(&config.templates_dir).unwrap();

    let app = actix_web::test::init_service(
        App::new()
            .wrap(flash_framework(&key))
            .wrap(IdentityMiddleware::default())
            .wrap(SessionMiddleware::new(CookieSessionStore::default(), key))
            .route(
                "/signed-in",
                web::get().to(|req: HttpRequest| async move {
                    match remember_user(&req, &bursar()) {
                        Ok(_) => HttpResponse::Ok().finish(),
                        Err(err) => HttpResponse::from_error(err),
                    }
                }),
            )
            .service(show_index)
            .app_data(web::Data::new(tera))
            .app_data(web::Data::new(client))
            .app_data(web::Data::new(config)),
    )
    .await;

    let req = actix_web::test::TestRequest::get()
        .uri("/signed-in")
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = resp
        .response()
        .cookies()
        // Drop removal cookies (`Max-Age=0`), as a browser would.
        .filter(|c| c.max_age() != Some(actix_web::cookie::time::Duration::ZERO))
        .map(|c| c.into_owned())
        .collect::<Vec<_>>();

    let mut req = actix_web::test::TestRequest::get().uri("/");
    for cookie in cookies {
        req = req.cookie(cookie);
    }
    let resp = actix_web::test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = actix_web::test::read_body(resp).await;
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("Dashboard unavailable"));
    assert!(body.contains("Something went wrong. Please try again."));
}
