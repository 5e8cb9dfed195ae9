use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::dto::ListQuery;
use crate::forms::payments::{ReasonForm, RefundForm};
use crate::models::config::ServerConfig;
use crate::routes::{
    backend, base_context, insert_list_query, mutation_response, page_error, render_template,
};
use crate::services::refunds as refunds_service;

#[get("/refunds")]
pub async fn show_refunds(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    query: web::Query<ListQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match refunds_service::load_refunds(
        &repo,
        &user,
        query.into_inner(),
        server_config.items_per_page,
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "refunds", &server_config);
            context.insert("refunds", &data.refunds);
            context.insert("refundable_payments", &data.refundable_payments);
            insert_list_query(&mut context, &data.query);

            render_template(&tera, "refunds/index.html", &context)
        }
        Err(err) => page_error(err, "refunds", "/"),
    }
}

#[post("/refunds")]
pub async fn request_refund(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<RefundForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = refunds_service::request_refund(&repo, &user, form).await;
    mutation_response(result, "Refund requested.", "request refund", "/refunds")
}

#[post("/refunds/{refund_id}/approve")]
pub async fn approve_refund(
    refund_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = refunds_service::approve_refund(&repo, &user, refund_id.into_inner()).await;
    mutation_response(result, "Refund approved.", "approve refund", "/refunds")
}

#[post("/refunds/{refund_id}/reject")]
pub async fn reject_refund(
    refund_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ReasonForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = refunds_service::reject_refund(&repo, &user, refund_id.into_inner(), form).await;
    mutation_response(result, "Refund rejected.", "reject refund", "/refunds")
}
