use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::forms::schools::{BranchForm, ClassroomForm};
use crate::models::config::ServerConfig;
use crate::routes::{backend, base_context, mutation_response, page_error, render_template};
use crate::services::schools as schools_service;

#[derive(Deserialize)]
pub struct ClassroomsQuery {
    #[serde(default)]
    pub branch_id: Option<String>,
}

impl ClassroomsQuery {
    /// Blank or malformed selections show every branch.
    fn branch_id(&self) -> Option<i64> {
        self.branch_id
            .as_deref()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
    }
}

#[get("/branches")]
pub async fn show_branches(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match schools_service::load_branches(&repo, &user).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "branches", &server_config);
            context.insert("branches", &data.branches);

            render_template(&tera, "schools/branches.html", &context)
        }
        Err(err) => page_error(err, "branches", "/"),
    }
}

#[post("/branches")]
pub async fn create_branch(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<BranchForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = schools_service::create_branch(&repo, &user, form).await;
    mutation_response(result, "Branch created.", "create branch", "/branches")
}

#[post("/branches/{branch_id}")]
pub async fn update_branch(
    branch_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<BranchForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = schools_service::update_branch(&repo, &user, branch_id.into_inner(), form).await;
    mutation_response(result, "Branch updated.", "update branch", "/branches")
}

#[get("/classrooms")]
pub async fn show_classrooms(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    query: web::Query<ClassroomsQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match schools_service::load_classrooms(&repo, &user, query.branch_id()).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "classrooms", &server_config);
            context.insert("classrooms", &data.classrooms);
            context.insert("branches", &data.branches);
            context.insert("teachers", &data.teachers);
            context.insert("selected_branch", &data.selected_branch);

            render_template(&tera, "schools/classrooms.html", &context)
        }
        Err(err) => page_error(err, "classrooms", "/"),
    }
}

#[post("/classrooms")]
pub async fn create_classroom(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ClassroomForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    let result = schools_service::create_classroom(&repo, &user, form).await;
    mutation_response(result, "Classroom created.", "create classroom", "/classrooms")
}
