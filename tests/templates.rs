use actix_web::web;
use serde_json::{Value, json};
use tera::{Context, Tera};

use school_admin::domain::auth::AuthenticatedUser;
use school_admin::domain::invoice::Invoice;
use school_admin::domain::refund::Refund;
use school_admin::domain::types::UserId;
use school_admin::dto::ListQuery;
use school_admin::finance::summary::FinanceSummary;
use school_admin::models::config::ServerConfig;
use school_admin::pagination::{PageSize, paginate};
use school_admin::routes::{insert_list_query, user_context};

fn templates() -> Tera {
    Tera::new("templates/**/*").unwrap()
}

fn server_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        templates_dir: "templates/**/*".to_string(),
        secret: "x".repeat(64),
        backend_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 1,
        items_per_page: 20,
        currency: "KSh".to_string(),
        max_photo_bytes: 1024,
    }
}

fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId::new(1).unwrap(),
        email: "office@example.com".to_string(),
        name: "Office".to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        school_name: Some("Hillside".to_string()),
        branch_id: None,
        token: "token-1".to_string(),
    }
}

fn page_context(roles: &[&str], current_page: &str) -> Context {
    let mut context = user_context(&user_with_roles(roles), current_page, &server_config());
    context.insert("alerts", &Vec::<(String, String)>::new());
    context
}

fn invoice(n: i64) -> Invoice {
    serde_json::from_value(json!({
        "id": n,
        "invoice_number": format!("INV-{n:04}"),
        "student_id": 7,
        "student_name": "Amina Otieno",
        "term": "Term 1",
        "academic_year": "2025",
        "issue_date": "2025-01-06",
        "total_amount": "15000.00",
        "paid_amount": "0",
        "balance": "15000.00",
        "status": "PENDING"
    }))
    .unwrap()
}

fn pending_refund() -> Refund {
    serde_json::from_value(json!({
        "id": 4,
        "payment_id": 9,
        "payment_reference": "MPESA-QX1",
        "student_id": 7,
        "student_name": "Amina Otieno",
        "amount": "500.00",
        "reason": "Overpaid",
        "status": "PENDING",
        "created_at": "2025-03-01T08:00:00Z"
    }))
    .unwrap()
}

fn render_invoices(query: &ListQuery) -> String {
    let invoices = (1..=25).map(invoice).collect::<Vec<_>>();
    let mut context = page_context(&["accountant"], "invoices");
    context.insert("invoices", &paginate(invoices, 1, PageSize::Count(20)));
    context.insert("summary", &FinanceSummary::default());
    context.insert("students", &Vec::<Value>::new());
    insert_list_query(&mut context, query);

    templates().render("invoices/index.html", &context).unwrap()
}

fn render_refunds(roles: &[&str]) -> String {
    let mut context = page_context(roles, "refunds");
    context.insert(
        "refunds",
        &paginate(vec![pending_refund()], 1, PageSize::Count(20)),
    );
    context.insert("refundable_payments", &Vec::<Value>::new());
    insert_list_query(&mut context, &ListQuery::default());

    templates().render("refunds/index.html", &context).unwrap()
}

#[test]
fn filtered_invoice_pages_keep_the_filter_in_links() {
    let query = ListQuery {
        search: Some("INV".to_string()),
        status: Some("PENDING".to_string()),
        ..ListQuery::default()
    };

    let html = render_invoices(&query);

    assert!(html.contains(r#"href="/invoices?page=2&search=INV&status=PENDING""#));
    assert!(html.contains(r#"href="/invoices/export.csv?search=INV&status=PENDING""#));

    let next = web::Query::<ListQuery>::from_query("page=2&search=INV&status=PENDING").unwrap();
    assert_eq!(next.page(), 2);
    assert_eq!(next.search.as_deref(), Some("INV"));
    assert!(!next.filter().is_empty());
}

#[test]
fn unfiltered_invoice_links_have_no_trailing_query() {
    let html = render_invoices(&ListQuery::default());

    assert!(html.contains(r#"href="/invoices?page=2""#));
    assert!(html.contains(r#"href="/invoices/export.csv""#));
}

#[test]
fn approval_controls_follow_roles_regardless_of_case() {
    for roles in [&["admin"][..], &["ADMIN"][..], &[" Admin "][..]] {
        let html = render_refunds(roles);
        assert!(html.contains("/refunds/4/approve"), "{roles:?}");
        assert!(html.contains(r#"href="/staff""#), "{roles:?}");
    }

    let html = render_refunds(&["Accountant"]);
    assert!(!html.contains("/refunds/4/approve"));
    assert!(!html.contains(r#"href="/staff""#));
    assert!(html.contains(r#"href="/invoices""#));
}

#[test]
fn teachers_do_not_see_finance_navigation() {
    let context = page_context(&["teacher"], "index");

    let html = templates().render("main/not_assigned.html", &context).unwrap();

    assert!(html.contains(r#"href="/students""#));
    assert!(!html.contains(r#"href="/invoices""#));
    assert!(!html.contains(r#"href="/staff""#));
}

#[test]
fn dashboard_unavailable_page_shows_the_alert() {
    let mut context = page_context(&["admin"], "index");
    context.insert(
        "alerts",
        &[("The server took too long to respond. Please try again.", "danger")],
    );

    let html = templates().render("main/unavailable.html", &context).unwrap();

    assert!(html.contains("alert-danger"));
    assert!(html.contains("The server took too long to respond."));
}
