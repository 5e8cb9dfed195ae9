use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::dto::ListQuery;
use crate::forms::students::{StudentForm, StudentPhotoForm};
use crate::models::config::ServerConfig;
use crate::routes::{
    backend, base_context, csv_response, insert_list_query, mutation_error, mutation_response,
    page_error, redirect, render_template,
};
use crate::services::students as students_service;

#[get("/students")]
pub async fn show_students(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    query: web::Query<ListQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match students_service::load_students(
        &repo,
        &user,
        query.into_inner(),
        server_config.items_per_page,
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "students", &server_config);
            context.insert("students", &data.students);
            context.insert("classrooms", &data.classrooms);
            context.insert("branches", &data.branches);
            insert_list_query(&mut context, &data.query);

            render_template(&tera, "students/index.html", &context)
        }
        Err(err) => page_error(err, "students", "/"),
    }
}

#[post("/students")]
pub async fn create_student(
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<StudentForm>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match students_service::create_student(&repo, &user, form).await {
        Ok(student) => {
            FlashMessage::success(format!("{} enrolled.", student.full_name())).send();
            redirect(&format!("/students/{}", student.id))
        }
        Err(err) => mutation_error(err, "create student", "/students"),
    }
}

#[get("/students/{student_id}")]
pub async fn show_student(
    student_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = backend(&client, &user);

    match students_service::load_student(&repo, &user, student_id.into_inner()).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "students", &server_config);
            context.insert("student", &data.student);
            context.insert("invoices", &data.invoices);
            context.insert("payments", &data.payments);
            context.insert("refunds", &data.refunds);
            context.insert("summary", &data.summary);
            context.insert("ledger", &data.ledger);
            context.insert("closing_balance", &data.closing_balance);
            context.insert("classrooms", &data.classrooms);
            context.insert("branches", &data.branches);

            render_template(&tera, "students/show.html", &context)
        }
        Err(err) => page_error(err, "student", "/students"),
    }
}

#[post("/students/{student_id}")]
pub async fn update_student(
    student_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<StudentForm>,
) -> impl Responder {
    let repo = backend(&client, &user);
    let student_id = student_id.into_inner();
    let back = format!("/students/{student_id}");

    let result = students_service::update_student(&repo, &user, student_id, form).await;
    mutation_response(result, "Student profile updated.", "update student", &back)
}

#[post("/students/{student_id}/photo")]
pub async fn upload_student_photo(
    student_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<StudentPhotoForm>,
) -> impl Responder {
    let repo = backend(&client, &user);
    let student_id = student_id.into_inner();
    let back = format!("/students/{student_id}");

    let result = students_service::upload_student_photo(
        &repo,
        &user,
        student_id,
        form,
        server_config.max_photo_bytes,
    )
    .await;
    mutation_response(result, "Photo uploaded.", "upload student photo", &back)
}

#[get("/students/{student_id}/ledger.csv")]
pub async fn export_student_ledger(
    student_id: web::Path<i64>,
    user: AuthenticatedUser,
    client: web::Data<ApiClient>,
) -> impl Responder {
    let repo = backend(&client, &user);
    let student_id = student_id.into_inner();

    match students_service::export_ledger(&repo, &user, student_id).await {
        Ok(export) => csv_response(export),
        Err(err) => page_error(err, "student ledger", &format!("/students/{student_id}")),
    }
}
