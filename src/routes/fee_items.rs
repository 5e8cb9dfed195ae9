use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::forms::fee_items::{FeeItemForm, GradeOverrideForm};
use crate::models::config::ServerConfig;
use crate::routes::{backend, base_context, mutation_response, page_error, render_template};
use crate::services::fee_items as fee_items_service;

#[get("/fee-items")]
pub async fn show_fee_items(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match fee_items_service::load_fee_items(&repo, &user).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "fee_items", &server_config);
            context.insert("fee_items", &data.fee_items);
            context.insert("categories", &data.categories);

            render_template(&tera, "fee_items/index.html", &context)
        }
        Err(err) => page_error(err, "fee items", "/"),
    }
}

#[post("/fee-items")]
pub async fn create_fee_item(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<FeeItemForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = fee_items_service::create_fee_item(&repo, &user, form).await;
    mutation_response(result, "Fee item created.", "create fee item", "/fee-items")
}

#[post("/fee-items/{fee_item_id}")]
pub async fn update_fee_item(
    fee_item_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<FeeItemForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result =
        fee_items_service::update_fee_item(&repo, &user, fee_item_id.into_inner(), form).await;
    mutation_response(result, "Fee item updated.", "update fee item", "/fee-items")
}

#[post("/fee-items/{fee_item_id}/overrides")]
/// Adds a per-grade price for one term.
pub async fn add_grade_override(
    fee_item_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<GradeOverrideForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result =
        fee_items_service::add_grade_override(&repo, &user, fee_item_id.into_inner(), form).await;
    mutation_response(result, "Grade price saved.", "add grade override", "/fee-items")
}
