use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::dto::ListQuery;
use crate::forms::payments::{AllocatePaymentForm, PaymentForm, ReasonForm};
use crate::models::config::ServerConfig;
use crate::routes::{
    backend, base_context, insert_list_query, mutation_error, mutation_response, page_error,
    redirect, render_template,
};
use crate::services::payments as payments_service;

#[get("/payments")]
pub async fn show_payments(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    query: web::Query<ListQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match payments_service::load_payments(
        &repo,
        &user,
        query.into_inner(),
        server_config.items_per_page,
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "payments", &server_config);
            context.insert("payments", &data.payments);
            context.insert("summary", &data.summary);
            context.insert("students", &data.students);
            context.insert("methods", &data.methods);
            insert_list_query(&mut context, &data.query);

            render_template(&tera, "payments/index.html", &context)
        }
        Err(err) => page_error(err, "payments", "/"),
    }
}

#[post("/payments")]
pub async fn record_payment(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<PaymentForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match payments_service::record_payment(&repo, &user, form).await {
        Ok(payment) => {
            FlashMessage::success(format!("Payment {} recorded.", payment.reference)).send();
            redirect(&format!("/payments/{}", payment.id))
        }
        Err(err) => mutation_error(err, "record payment", "/payments"),
    }
}

#[get("/payments/{payment_id}")]
pub async fn show_payment(
    payment_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match payments_service::load_payment(&repo, &user, payment_id.into_inner()).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "payments", &server_config);
            context.insert("payment", &data.payment);
            context.insert("refunds", &data.refunds);
            context.insert("open_invoices", &data.open_invoices);

            render_template(&tera, "payments/show.html", &context)
        }
        Err(err) => page_error(err, "payment", "/payments"),
    }
}

#[post("/payments/{payment_id}/approve")]
pub async fn approve_payment(
    payment_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
) -> impl Responder {
    let repo = backend(&client, &user);
    let payment_id = payment_id.into_inner();

    let result = payments_service::approve_payment(&repo, &user, payment_id).await;
    mutation_response(
        result,
        "Payment approved.",
        "approve payment",
        &format!("/payments/{payment_id}"),
    )
}

#[post("/payments/{payment_id}/reverse")]
pub async fn reverse_payment(
    payment_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ReasonForm>,
) -> impl Responder {
    let repo = backend(&client, &user);
    let payment_id = payment_id.into_inner();

    let result = payments_service::reverse_payment(&repo, &user, payment_id, form).await;
    mutation_response(
        result,
        "Payment reversed.",
        "reverse payment",
        &format!("/payments/{payment_id}"),
    )
}

#[post("/payments/{payment_id}/allocate")]
pub async fn allocate_payment(
    payment_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<AllocatePaymentForm>,
) -> impl Responder {
    let repo = backend(&client, &user);
    let payment_id = payment_id.into_inner();

    let result = payments_service::allocate_payment(&repo, &user, payment_id, form).await;
    mutation_response(
        result,
        "Payment allocated.",
        "allocate payment",
        &format!("/payments/{payment_id}"),
    )
}
