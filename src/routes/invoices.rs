use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::invoice::BulkInvoiceResult;
use crate::dto::ListQuery;
use crate::dto::finance::BulkInvoicePageData;
use crate::forms::invoices::{BulkInvoiceForm, CancelInvoiceForm, InvoiceForm};
use crate::forms::parse_multi_value;
use crate::models::config::ServerConfig;
use crate::routes::{
    backend, base_context, csv_response, insert_list_query, mutation_error, mutation_response,
    page_error, redirect, render_template,
};
use crate::services::invoices as invoices_service;

const BULK_PATH: &str = "/invoices/bulk";

#[get("/invoices")]
pub async fn show_invoices(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    query: web::Query<ListQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match invoices_service::load_invoices(
        &repo,
        &user,
        query.into_inner(),
        server_config.items_per_page,
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "invoices", &server_config);
            context.insert("invoices", &data.invoices);
            context.insert("summary", &data.summary);
            context.insert("students", &data.students);
            insert_list_query(&mut context, &data.query);

            render_template(&tera, "invoices/index.html", &context)
        }
        Err(err) => page_error(err, "invoices", "/"),
    }
}

#[get("/invoices/export.csv")]
/// Every invoice matching the list filter, ignoring pagination.
pub async fn export_invoices(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match invoices_service::export_invoices(&repo, &user, &query).await {
        Ok(export) => csv_response(export),
        Err(err) => page_error(err, "invoice export", "/invoices"),
    }
}

#[post("/invoices")]
pub async fn create_invoice(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    body: web::Bytes,
) -> impl Responder {
    let form: InvoiceForm = match parse_multi_value(&body) {
        Ok(form) => form,
        Err(err) => return mutation_error(err.into(), "create invoice", "/invoices"),
    };
    let repo = backend(&client, &user);

    match invoices_service::create_invoice(&repo, &user, form).await {
        Ok(invoice) => {
            FlashMessage::success(format!("Invoice {} created.", invoice.invoice_number)).send();
            redirect(&format!("/invoices/{}", invoice.id))
        }
        Err(err) => mutation_error(err, "create invoice", "/invoices"),
    }
}

#[get("/invoices/bulk")]
pub async fn show_bulk_invoice(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match invoices_service::load_bulk_invoice_page(&repo, &user).await {
        Ok(data) => render_bulk_page(&tera, &flash_messages, &user, &server_config, &data),
        Err(err) => page_error(err, "bulk invoicing", "/invoices"),
    }
}

#[post("/invoices/bulk/preview")]
/// Re-renders the bulk page with the per-student totals the submission would create.
pub async fn preview_bulk_invoice(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let form: BulkInvoiceForm = match parse_multi_value(&body) {
        Ok(form) => form,
        Err(err) => return mutation_error(err.into(), "preview bulk invoice", BULK_PATH),
    };
    let repo = backend(&client, &user);

    match invoices_service::preview_bulk_invoice(&repo, &user, form).await {
        Ok(data) => render_bulk_page(&tera, &flash_messages, &user, &server_config, &data),
        Err(err) => mutation_error(err, "preview bulk invoice", BULK_PATH),
    }
}

#[post("/invoices/bulk")]
pub async fn submit_bulk_invoice(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    body: web::Bytes,
) -> impl Responder {
    let form: BulkInvoiceForm = match parse_multi_value(&body) {
        Ok(form) => form,
        Err(err) => return mutation_error(err.into(), "submit bulk invoice", BULK_PATH),
    };
    let repo = backend(&client, &user);

    match invoices_service::submit_bulk_invoice(&repo, &user, form).await {
        Ok(result) => {
            flash_bulk_result(&result);
            redirect("/invoices")
        }
        Err(err) => mutation_error(err, "submit bulk invoice", BULK_PATH),
    }
}

#[get("/invoices/{invoice_id}")]
pub async fn show_invoice(
    invoice_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match invoices_service::load_invoice(&repo, &user, invoice_id.into_inner()).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "invoices", &server_config);
            context.insert("invoice", &data.invoice);
            context.insert("allocatable_payments", &data.allocatable_payments);

            render_template(&tera, "invoices/show.html", &context)
        }
        Err(err) => page_error(err, "invoice", "/invoices"),
    }
}

#[post("/invoices/{invoice_id}/cancel")]
pub async fn cancel_invoice(
    invoice_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<CancelInvoiceForm>,
) -> impl Responder {
    let repo = backend(&client, &user);
    let invoice_id = invoice_id.into_inner();
    let back = format!("/invoices/{invoice_id}");

    let result = invoices_service::cancel_invoice(&repo, &user, invoice_id, form).await;
    mutation_response(result, "Invoice cancelled.", "cancel invoice", &back)
}

fn render_bulk_page(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    server_config: &ServerConfig,
    data: &BulkInvoicePageData,
) -> HttpResponse {
    let mut context = base_context(flash_messages, user, "invoices", server_config);
    context.insert("classrooms", &data.classrooms);
    context.insert("fee_items", &data.fee_items);
    context.insert("preview", &data.preview);

    render_template(tera, "invoices/bulk.html", &context)
}

fn flash_bulk_result(result: &BulkInvoiceResult) {
    let summary = format!(
        "{} invoice(s) created, {} skipped.",
        result.created, result.skipped
    );
    if result.errors.is_empty() {
        FlashMessage::success(summary).send();
    } else {
        FlashMessage::warning(format!("{summary} {}", result.errors.join("; "))).send();
    }
}
