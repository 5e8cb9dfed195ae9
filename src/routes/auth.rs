use actix_identity::Identity;
use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::client::ApiClient;
use crate::forms::auth::LoginForm;
use crate::middleware::{SIGN_IN_PATH, remember_user};
use crate::repository::BackendRepository;
use crate::routes::{alert_level_to_str, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};

#[get("/auth")]
/// Sign-in form. Any stale session is purged first.
pub async fn show_login(
    identity: Option<Identity>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    session.purge();

    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", "auth");

    render_template(&tera, "auth/login.html", &context)
}

#[post("/auth/login")]
pub async fn login(
    request: HttpRequest,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let repo = BackendRepository::anonymous(client.get_ref());

    match auth_service::login(&repo, form).await {
        Ok(user) => match remember_user(&request, &user) {
            Ok(_) => {
                FlashMessage::success(format!("Welcome back, {}.", user.name)).send();
                redirect("/")
            }
            Err(err) => {
                log::error!("Failed to store session for {}: {err}", user.email);
                HttpResponse::InternalServerError().finish()
            }
        },
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(SIGN_IN_PATH)
        }
        Err(err) => {
            FlashMessage::error(err.user_message()).send();
            redirect(SIGN_IN_PATH)
        }
    }
}
