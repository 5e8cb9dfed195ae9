use actix_identity::Identity;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::middleware::SIGN_IN_PATH;
use crate::models::config::ServerConfig;
use crate::routes::{backend, base_context, page_error, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service, dashboard as dashboard_service};

#[get("/")]
pub async fn show_index(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match dashboard_service::load_dashboard(&repo, &user).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "index", &server_config);
            context.insert("student_count", &data.student_count);
            context.insert("staff_count", &data.staff_count);
            context.insert("summary", &data.summary);
            context.insert("recent_invoices", &data.recent_invoices);
            context.insert("recent_payments", &data.recent_payments);

            render_template(&tera, "main/index.html", &context)
        }
        Err(err @ (ServiceError::Unauthorized | ServiceError::Forbidden)) => {
            page_error(err, "dashboard", SIGN_IN_PATH)
        }
        // List pages fall back to `/`, so this must not redirect.
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            let mut context = base_context(&flash_messages, &user, "index", &server_config);
            context.insert("alerts", &[(err.user_message(), "danger")]);
            render_template(&tera, "main/unavailable.html", &context)
        }
    }
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &user, "index", &server_config);
    render_template(&tera, "main/not_assigned.html", &context)
}

#[post("/logout")]
/// Revokes the backend token, then drops the local session.
pub async fn logout(
    user: AuthenticatedUser,
    identity: Identity,
    client: web::Data<ApiClient>,
) -> impl Responder {
    let repo = backend(&client, &user);
    auth_service::logout(&repo, &user).await;
    identity.logout();
    redirect(SIGN_IN_PATH)
}
