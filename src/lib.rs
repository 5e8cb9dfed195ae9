#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::middleware::{Compress, Logger};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::client::ApiClient;
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::routes::api::proxy;
#[cfg(feature = "server")]
use crate::routes::auth::{login, show_login};
#[cfg(feature = "server")]
use crate::routes::expenses::{approve_expense, record_expense, reject_expense, show_expenses};
#[cfg(feature = "server")]
use crate::routes::fee_items::{
    add_grade_override, create_fee_item, show_fee_items, update_fee_item,
};
#[cfg(feature = "server")]
use crate::routes::invoices::{
    cancel_invoice, create_invoice, export_invoices, preview_bulk_invoice, show_bulk_invoice,
    show_invoice, show_invoices, submit_bulk_invoice,
};
#[cfg(feature = "server")]
use crate::routes::main::{logout, not_assigned, show_index};
#[cfg(feature = "server")]
use crate::routes::payments::{
    allocate_payment, approve_payment, record_payment, reverse_payment, show_payment,
    show_payments,
};
#[cfg(feature = "server")]
use crate::routes::refunds::{approve_refund, reject_refund, request_refund, show_refunds};
#[cfg(feature = "server")]
use crate::routes::schools::{
    create_branch, create_classroom, show_branches, show_classrooms, update_branch,
};
#[cfg(feature = "server")]
use crate::routes::staff::{create_staff, show_staff, update_staff};
#[cfg(feature = "server")]
use crate::routes::students::{
    create_student, export_student_ledger, show_student, show_students, update_student,
    upload_student_photo,
};

#[cfg(feature = "server")]
pub mod client;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
pub mod finance;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
pub mod pagination;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Role that passes every permission check.
pub const ADMIN_ROLE: &str = "admin";
/// Role for finance pages and finance mutations.
pub const FINANCE_ROLE: &str = "accountant";

/// Minimum secret length accepted by [`Key::from`].
#[cfg(feature = "server")]
const MIN_SECRET_BYTES: usize = 64;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    if server_config.secret.len() < MIN_SECRET_BYTES {
        return Err(std::io::Error::other(format!(
            "secret must be at least {MIN_SECRET_BYTES} bytes long"
        )));
    }

    let client = ApiClient::new(&server_config.backend_url, server_config.request_timeout())
        .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;
    log::info!("Using backend at {}", server_config.backend_url);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_login)
            .service(login)
            .service(web::scope("/api").service(proxy))
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(not_assigned)
                    .service(logout)
                    .service(show_students)
                    .service(create_student)
                    .service(show_student)
                    .service(update_student)
                    .service(upload_student_photo)
                    .service(export_student_ledger)
                    .service(show_staff)
                    .service(create_staff)
                    .service(update_staff)
                    .service(show_branches)
                    .service(create_branch)
                    .service(update_branch)
                    .service(show_classrooms)
                    .service(create_classroom)
                    .service(show_fee_items)
                    .service(create_fee_item)
                    .service(update_fee_item)
                    .service(add_grade_override)
                    .service(show_invoices)
                    .service(export_invoices)
                    .service(show_bulk_invoice)
                    .service(preview_bulk_invoice)
                    .service(submit_bulk_invoice)
                    .service(create_invoice)
                    .service(show_invoice)
                    .service(cancel_invoice)
                    .service(show_payments)
                    .service(record_payment)
                    .service(show_payment)
                    .service(approve_payment)
                    .service(reverse_payment)
                    .service(allocate_payment)
                    .service(show_refunds)
                    .service(request_refund)
                    .service(approve_refund)
                    .service(reject_refund)
                    .service(show_expenses)
                    .service(record_expense)
                    .service(approve_expense)
                    .service(reject_expense),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
