use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::dto::ListQuery;
use crate::forms::expenses::ExpenseForm;
use crate::forms::payments::ReasonForm;
use crate::models::config::ServerConfig;
use crate::routes::{
    backend, base_context, insert_list_query, mutation_response, page_error, render_template,
};
use crate::services::expenses as expenses_service;

#[get("/expenses")]
pub async fn show_expenses(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    query: web::Query<ListQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match expenses_service::load_expenses(
        &repo,
        &user,
        query.into_inner(),
        server_config.items_per_page,
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "expenses", &server_config);
            context.insert("expenses", &data.expenses);
            context.insert("summary", &data.summary);
            context.insert("branches", &data.branches);
            insert_list_query(&mut context, &data.query);

            render_template(&tera, "expenses/index.html", &context)
        }
        Err(err) => page_error(err, "expenses", "/"),
    }
}

#[post("/expenses")]
pub async fn record_expense(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ExpenseForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = expenses_service::record_expense(&repo, &user, form).await;
    mutation_response(result, "Expense recorded.", "record expense", "/expenses")
}

#[post("/expenses/{expense_id}/approve")]
pub async fn approve_expense(
    expense_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = expenses_service::approve_expense(&repo, &user, expense_id.into_inner()).await;
    mutation_response(result, "Expense approved.", "approve expense", "/expenses")
}

#[post("/expenses/{expense_id}/reject")]
pub async fn reject_expense(
    expense_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ReasonForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result =
        expenses_service::reject_expense(&repo, &user, expense_id.into_inner(), form).await;
    mutation_response(result, "Expense rejected.", "reject expense", "/expenses")
}
