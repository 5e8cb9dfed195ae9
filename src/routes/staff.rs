use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::dto::ListQuery;
use crate::forms::staff::StaffForm;
use crate::models::config::ServerConfig;
use crate::routes::{
    backend, base_context, insert_list_query, mutation_response, page_error, render_template,
};
use crate::services::staff as staff_service;

#[get("/staff")]
pub async fn show_staff(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    query: web::Query<ListQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match staff_service::load_staff(&repo, &user, query.into_inner(), server_config.items_per_page)
        .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "staff", &server_config);
            context.insert("staff", &data.staff);
            context.insert("branches", &data.branches);
            context.insert("roles", &data.roles);
            insert_list_query(&mut context, &data.query);

            render_template(&tera, "staff/index.html", &context)
        }
        Err(err) => page_error(err, "staff", "/"),
    }
}

#[post("/staff")]
pub async fn create_staff(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<StaffForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = staff_service::create_staff(&repo, &user, form).await;
    mutation_response(result, "Staff member added.", "create staff member", "/staff")
}

#[post("/staff/{staff_id}")]
pub async fn update_staff(
    staff_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<StaffForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = staff_service::update_staff(&repo, &user, staff_id.into_inner(), form).await;
    mutation_response(result, "Staff member updated.", "update staff member", "/staff")
}
