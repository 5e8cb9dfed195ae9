//! Actix handlers and the helpers they share.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::client::ApiClient;
use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::dto::{CsvExport, ListQuery};
use crate::middleware::SIGN_IN_PATH;
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::services::ServiceError;
use crate::{ADMIN_ROLE, FINANCE_ROLE};

pub mod api;
pub mod auth;
pub mod expenses;
pub mod fee_items;
pub mod invoices;
pub mod main;
pub mod payments;
pub mod refunds;
pub mod schools;
pub mod staff;
pub mod students;

/// Page shown to signed-in users whose roles do not cover the request.
pub const NOT_ASSIGNED_PATH: &str = "/na";

/// Bootstrap alert class for a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info | Level::Debug => "info",
    }
}

/// Context every page template expects: alerts, the current user and navigation.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    server_config: &ServerConfig,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = user_context(user, current_page, server_config);
    context.insert("alerts", &alerts);
    context
}

/// User, role flags and navigation state. Role flags compare case-insensitively.
pub fn user_context(
    user: &AuthenticatedUser,
    current_page: &str,
    server_config: &ServerConfig,
) -> Context {
    let is_admin = check_role(ADMIN_ROLE, &user.roles);

    let mut context = Context::new();
    context.insert("current_user", &user.public());
    context.insert("is_admin", &is_admin);
    context.insert("is_finance", &(is_admin || check_role(FINANCE_ROLE, &user.roles)));
    context.insert("current_page", current_page);
    context.insert("currency", &server_config.currency);
    context
}

/// Inserts the list query and its filters re-encoded for pagination and
/// export links.
pub fn insert_list_query(context: &mut Context, query: &ListQuery) {
    context.insert("query", query);
    context.insert("query_string", &query.to_query_string());
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn csv_response(export: CsvExport) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ))
        .body(export.content)
}

/// Repository bound to the bearer token of the session user.
pub(crate) fn backend<'a>(
    client: &'a web::Data<ApiClient>,
    user: &'a AuthenticatedUser,
) -> BackendRepository<'a> {
    BackendRepository::new(client.get_ref(), &user.token)
}

/// Response for a failed page load. Backend and input errors are flashed and
/// the user is sent to `fallback`, usually the enclosing listing.
pub fn page_error(err: ServiceError, what: &str, fallback: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => redirect(SIGN_IN_PATH),
        ServiceError::Forbidden => {
            FlashMessage::error(err.user_message()).send();
            redirect(NOT_ASSIGNED_PATH)
        }
        ServiceError::NotFound
        | ServiceError::TypeConstraint(_)
        | ServiceError::Form(_)
        | ServiceError::Backend(_) => {
            log::warn!("Failed to load {what}: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect(fallback)
        }
        ServiceError::Internal(_) => {
            log::error!("Failed to load {what}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Flash and redirect for a mutation: success message on `Ok`, the
/// user-facing error otherwise.
pub fn mutation_response<T>(
    result: Result<T, ServiceError>,
    success: &str,
    what: &str,
    back: &str,
) -> HttpResponse {
    match result {
        Ok(_) => {
            FlashMessage::success(success).send();
            redirect(back)
        }
        Err(err) => mutation_error(err, what, back),
    }
}

pub fn mutation_error(err: ServiceError, what: &str, back: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => redirect(SIGN_IN_PATH),
        ServiceError::Forbidden => {
            FlashMessage::error(err.user_message()).send();
            redirect(NOT_ASSIGNED_PATH)
        }
        ServiceError::Internal(_) => {
            log::error!("Failed to {what}: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect(back)
        }
        err => {
            FlashMessage::error(err.user_message()).send();
            redirect(back)
        }
    }
}
