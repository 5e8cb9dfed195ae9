//! Invoices: filtered list with totals, detail, single and bulk creation,
//! cancellation and CSV export.

use std::collections::HashSet;

use futures_util::try_join;
use rust_decimal::Decimal;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::invoice::{
    BulkInvoiceRequest, BulkInvoiceResult, CancelInvoice, Invoice, NewInvoice, NewInvoiceLine,
};
use crate::domain::payment::PaymentStatus;
use crate::domain::student::StudentStatus;
use crate::domain::types::{Amount, EntityName, InvoiceId};
use crate::dto::finance::{
    BulkInvoicePageData, BulkInvoicePreview, BulkPreviewRow, InvoicePageData, InvoicesPageData,
};
use crate::dto::{CsvExport, ListQuery};
use crate::finance::fees::resolve_fee_lines;
use crate::finance::summary::FinanceSummary;
use crate::forms::invoices::{BulkInvoiceForm, BulkInvoicePayload, CancelInvoiceForm, InvoiceForm};
use crate::pagination::paginate;
use crate::repository::{
    ClassroomListQuery, ClassroomReader, FeeItemReader, InvoiceListQuery, InvoiceReader,
    InvoiceWriter, PaymentListQuery, PaymentReader, StudentListQuery, StudentReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_finance, write_csv};

/// Invoice list with totals over every row matching the filter.
///
/// With an active filter the payment side of the summary is limited to the
/// students that appear in the filtered invoices.
pub async fn load_invoices<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ListQuery,
    per_page: usize,
) -> ServiceResult<InvoicesPageData>
where
    R: InvoiceReader + PaymentReader + StudentReader + ?Sized,
{
    ensure_finance(user)?;

    let (invoices, payments, students) = try_join!(
        repo.list_invoices(InvoiceListQuery::new()),
        repo.list_payments(PaymentListQuery::new()),
        repo.list_students(StudentListQuery::new().status(StudentStatus::Active)),
    )
    .map_err(|err| {
        log::error!("Failed to list invoices: {err}");
        err
    })?;

    let filter = query.filter();
    let filtered = !filter.is_empty();
    let invoices = filter.apply(invoices);

    let payments = if filtered {
        let student_ids: HashSet<_> = invoices.iter().map(|i| i.student_id).collect();
        payments
            .into_iter()
            .filter(|p| student_ids.contains(&p.student_id))
            .collect()
    } else {
        payments
    };
    let summary = FinanceSummary::compute(&invoices, &payments);

    Ok(InvoicesPageData {
        invoices: paginate(invoices, query.page(), query.page_size(per_page)),
        summary,
        students,
        query,
    })
}

/// Filtered invoices as CSV, every page included.
pub async fn export_invoices<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &ListQuery,
) -> ServiceResult<CsvExport>
where
    R: InvoiceReader + ?Sized,
{
    ensure_finance(user)?;

    let invoices = repo
        .list_invoices(InvoiceListQuery::new())
        .await
        .map_err(|err| {
            log::error!("Failed to export invoices: {err}");
            err
        })?;
    let invoices = query.filter().apply(invoices);

    let content = write_csv(
        &[
            "invoice_number",
            "student",
            "term",
            "academic_year",
            "issue_date",
            "due_date",
            "total",
            "paid",
            "balance",
            "status",
        ],
        invoices.iter().map(|invoice| {
            vec![
                invoice.invoice_number.clone(),
                invoice.student_name.clone(),
                invoice.term.clone().unwrap_or_default(),
                invoice.academic_year.clone().unwrap_or_default(),
                invoice.issue_date.to_string(),
                invoice.due_date.map(|d| d.to_string()).unwrap_or_default(),
                invoice.total_amount.round_dp(2).to_string(),
                invoice.paid_amount.round_dp(2).to_string(),
                invoice.balance.round_dp(2).to_string(),
                invoice.status.as_str().to_string(),
            ]
        }),
    )?;

    Ok(CsvExport {
        filename: "invoices.csv".to_string(),
        content,
    })
}

/// Invoice detail with the student's payments that still hold unallocated money.
pub async fn load_invoice<R>(
    repo: &R,
    user: &AuthenticatedUser,
    invoice_id: i64,
) -> ServiceResult<InvoicePageData>
where
    R: InvoiceReader + PaymentReader + ?Sized,
{
    ensure_finance(user)?;
    let id = InvoiceId::new(invoice_id)?;

    let invoice = repo.get_invoice(id).await.map_err(|err| {
        log::error!("Failed to load invoice {invoice_id}: {err}");
        err
    })?;

    let payments = repo
        .list_payments(
            PaymentListQuery::new()
                .student(invoice.student_id)
                .status(PaymentStatus::Completed),
        )
        .await
        .map_err(|err| {
            log::error!("Failed to load payments for invoice {invoice_id}: {err}");
            err
        })?;

    let allocatable_payments = payments
        .into_iter()
        .filter(|p| p.status == PaymentStatus::Completed && p.unallocated_amount > Decimal::ZERO)
        .collect();

    Ok(InvoicePageData {
        invoice,
        allocatable_payments,
    })
}

pub async fn create_invoice<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: InvoiceForm,
) -> ServiceResult<Invoice>
where
    R: InvoiceWriter + ?Sized,
{
    ensure_finance(user)?;
    let payload = NewInvoice::try_from(form)?;

    let invoice = repo.create_invoice(&payload).await.map_err(|err| {
        log::error!("Failed to create invoice for student {}: {err}", payload.student_id);
        err
    })?;
    log::info!(
        "Invoice {} for {} created by {}",
        invoice.invoice_number,
        payload.total(),
        user.email
    );
    Ok(invoice)
}

/// Cancels an invoice that has not been paid into.
pub async fn cancel_invoice<R>(
    repo: &R,
    user: &AuthenticatedUser,
    invoice_id: i64,
    form: CancelInvoiceForm,
) -> ServiceResult<Invoice>
where
    R: InvoiceReader + InvoiceWriter + ?Sized,
{
    ensure_finance(user)?;
    let id = InvoiceId::new(invoice_id)?;
    let payload = CancelInvoice::try_from(form)?;

    let current = repo.get_invoice(id).await?;
    if !current.status.is_cancellable() {
        return Err(ServiceError::Form(format!(
            "Invoice {} is {} and cannot be cancelled.",
            current.invoice_number,
            current.status.as_str().to_lowercase().replace('_', " ")
        )));
    }

    let invoice = repo.cancel_invoice(id, &payload).await.map_err(|err| {
        log::error!("Failed to cancel invoice {invoice_id}: {err}");
        err
    })?;
    log::info!("Invoice {} cancelled by {}", invoice.invoice_number, user.email);
    Ok(invoice)
}

/// Empty bulk invoice page: the classroom and fee item pickers.
pub async fn load_bulk_invoice_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<BulkInvoicePageData>
where
    R: ClassroomReader + FeeItemReader + ?Sized,
{
    ensure_finance(user)?;

    let (classrooms, fee_items) = try_join!(
        repo.list_classrooms(ClassroomListQuery::new()),
        repo.list_fee_items(),
    )
    .map_err(|err| {
        log::error!("Failed to load bulk invoice page: {err}");
        err
    })?;

    Ok(BulkInvoicePageData {
        classrooms,
        fee_items: fee_items.into_iter().filter(|f| f.is_active).collect(),
        preview: None,
    })
}

/// Resolved lines and per-student totals for the selection, plus the pickers
/// so the page can be re-rendered.
pub async fn preview_bulk_invoice<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: BulkInvoiceForm,
) -> ServiceResult<BulkInvoicePageData>
where
    R: ClassroomReader + FeeItemReader + StudentReader + ?Sized,
{
    ensure_finance(user)?;
    let payload = BulkInvoicePayload::try_from(form)?;

    let mut page = load_bulk_invoice_page(repo, user).await?;
    let preview = build_preview(repo, &page, &payload).await?;
    page.preview = Some(preview);
    Ok(page)
}

/// Creates one invoice per active student of the classroom with the
/// resolved line amounts.
pub async fn submit_bulk_invoice<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: BulkInvoiceForm,
) -> ServiceResult<BulkInvoiceResult>
where
    R: ClassroomReader + FeeItemReader + StudentReader + InvoiceWriter + ?Sized,
{
    ensure_finance(user)?;
    let payload = BulkInvoicePayload::try_from(form)?;

    let page = load_bulk_invoice_page(repo, user).await?;
    let preview = build_preview(repo, &page, &payload).await?;

    let lines = preview
        .lines
        .iter()
        .map(|line| {
            Ok(NewInvoiceLine {
                fee_item_id: Some(line.fee_item_id),
                description: EntityName::new(line.name.as_str())?,
                amount: Amount::new(line.amount)?,
            })
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    let request = BulkInvoiceRequest {
        student_ids: preview.rows.iter().map(|row| row.student_id).collect(),
        term: payload.term,
        academic_year: payload.academic_year,
        issue_date: payload.issue_date,
        due_date: payload.due_date,
        lines,
    };

    let result = repo.create_bulk_invoices(&request).await.map_err(|err| {
        log::error!(
            "Failed to bulk invoice classroom {}: {err}",
            payload.classroom_id
        );
        err
    })?;
    log::info!(
        "Bulk invoice for classroom {} by {}: {} created, {} skipped",
        payload.classroom_id,
        user.email,
        result.created,
        result.skipped
    );
    Ok(result)
}

async fn build_preview<R>(
    repo: &R,
    page: &BulkInvoicePageData,
    payload: &BulkInvoicePayload,
) -> ServiceResult<BulkInvoicePreview>
where
    R: StudentReader + ?Sized,
{
    let classroom = page
        .classrooms
        .iter()
        .find(|c| c.id == payload.classroom_id)
        .cloned()
        .ok_or(ServiceError::NotFound)?;

    let selected: Vec<_> = page
        .fee_items
        .iter()
        .filter(|f| payload.fee_item_ids.contains(&f.id))
        .cloned()
        .collect();
    if selected.len() != payload.fee_item_ids.len() {
        return Err(ServiceError::Form(
            "One of the selected fee items is no longer available.".to_string(),
        ));
    }

    let lines: Vec<_> = resolve_fee_lines(
        &selected,
        &classroom.grade,
        payload.term.as_str(),
        payload.academic_year.as_str(),
    )
    .into_iter()
    .filter(|line| line.amount > Decimal::ZERO)
    .collect();
    if lines.is_empty() {
        return Err(ServiceError::Form(
            "The selected fee items resolve to zero for this grade.".to_string(),
        ));
    }

    let students = repo
        .list_students(
            StudentListQuery::new()
                .classroom(classroom.id)
                .status(StudentStatus::Active),
        )
        .await
        .map_err(|err| {
            log::error!("Failed to list students of classroom {}: {err}", classroom.id);
            err
        })?;
    let students: Vec<_> = students
        .into_iter()
        .filter(|s| s.status == StudentStatus::Active)
        .collect();
    if students.is_empty() {
        return Err(ServiceError::Form(format!(
            "Classroom {} has no active students.",
            classroom.name
        )));
    }

    let per_student_total: Decimal = lines.iter().map(|line| line.amount).sum();
    let rows: Vec<_> = students
        .iter()
        .map(|student| BulkPreviewRow {
            student_id: student.id,
            admission_number: student.admission_number.clone(),
            name: student.full_name(),
            total: per_student_total,
        })
        .collect();
    let grand_total = per_student_total * Decimal::from(rows.len());

    Ok(BulkInvoicePreview {
        classroom,
        term: payload.term.to_string(),
        academic_year: payload.academic_year.to_string(),
        issue_date: payload.issue_date,
        due_date: payload.due_date,
        lines,
        rows,
        per_student_total,
        grand_total,
    })
}
