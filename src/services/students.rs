//! Student directory, profiles, photos and the per-student ledger.

use futures_util::try_join;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::student::{NewStudent, Student};
use crate::domain::types::{BranchId, ClassroomId, StudentId};
use crate::dto::students::{StudentPageData, StudentsPageData};
use crate::dto::{CsvExport, ListQuery};
use crate::finance::ledger::{build_ledger, closing_balance};
use crate::finance::summary::FinanceSummary;
use crate::forms::students::{StudentForm, StudentPhotoForm};
use crate::pagination::paginate;
use crate::repository::{
    BranchReader, ClassroomListQuery, ClassroomReader, InvoiceListQuery, InvoiceReader,
    PaymentListQuery, PaymentReader, RefundListQuery, RefundReader, StudentListQuery,
    StudentReader, StudentWriter,
};
use crate::services::{ServiceResult, ensure_admin, ensure_finance, write_csv};

/// Lists students narrowed by classroom and branch on the backend, then by
/// search, status and enrolment date locally.
pub async fn load_students<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ListQuery,
    per_page: usize,
) -> ServiceResult<StudentsPageData>
where
    R: StudentReader + ClassroomReader + BranchReader + ?Sized,
{
    ensure_finance(user)?;

    let mut list_query = StudentListQuery::new();
    if let Some(id) = query.classroom().and_then(|id| ClassroomId::new(id).ok()) {
        list_query = list_query.classroom(id);
    }
    if let Some(id) = query.branch().and_then(|id| BranchId::new(id).ok()) {
        list_query = list_query.branch(id);
    }

    let (students, classrooms, branches) = try_join!(
        repo.list_students(list_query),
        repo.list_classrooms(ClassroomListQuery::new()),
        repo.list_branches(),
    )
    .map_err(|err| {
        log::error!("Failed to list students: {err}");
        err
    })?;

    let students = query.filter().apply(students);
    let students = paginate(students, query.page(), query.page_size(per_page));

    Ok(StudentsPageData {
        students,
        classrooms,
        branches,
        query,
    })
}

/// Loads a student together with the complete finance history.
pub async fn load_student<R>(
    repo: &R,
    user: &AuthenticatedUser,
    student_id: i64,
) -> ServiceResult<StudentPageData>
where
    R: StudentReader
        + InvoiceReader
        + PaymentReader
        + RefundReader
        + ClassroomReader
        + BranchReader
        + ?Sized,
{
    ensure_finance(user)?;
    let id = StudentId::new(student_id)?;

    let (student, invoices, payments, refunds, classrooms, branches) = try_join!(
        repo.get_student(id),
        repo.list_invoices(InvoiceListQuery::new().student(id)),
        repo.list_payments(PaymentListQuery::new().student(id)),
        repo.list_refunds(RefundListQuery::new().student(id)),
        repo.list_classrooms(ClassroomListQuery::new()),
        repo.list_branches(),
    )
    .map_err(|err| {
        log::error!("Failed to load student {student_id}: {err}");
        err
    })?;

    let summary = FinanceSummary::compute(&invoices, &payments);
    let ledger = build_ledger(&invoices, &payments, &refunds);
    let closing_balance = closing_balance(&ledger);

    Ok(StudentPageData {
        student,
        invoices,
        payments,
        refunds,
        summary,
        ledger,
        closing_balance,
        classrooms,
        branches,
    })
}

pub async fn create_student<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: StudentForm,
) -> ServiceResult<Student>
where
    R: StudentWriter + ?Sized,
{
    ensure_admin(user)?;
    let payload = NewStudent::try_from(form)?;

    let student = repo.create_student(&payload).await.map_err(|err| {
        log::error!("Failed to create student: {err}");
        err
    })?;
    log::info!("Student {} enrolled by {}", student.id, user.email);
    Ok(student)
}

pub async fn update_student<R>(
    repo: &R,
    user: &AuthenticatedUser,
    student_id: i64,
    form: StudentForm,
) -> ServiceResult<Student>
where
    R: StudentWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = StudentId::new(student_id)?;
    let payload = NewStudent::try_from(form)?;

    repo.update_student(id, &payload).await.map_err(|err| {
        log::error!("Failed to update student {student_id}: {err}");
        err.into()
    })
}

/// Encodes the uploaded image as a data URL and stores it on the profile.
pub async fn upload_student_photo<R>(
    repo: &R,
    user: &AuthenticatedUser,
    student_id: i64,
    form: StudentPhotoForm,
    max_bytes: usize,
) -> ServiceResult<Student>
where
    R: StudentWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = StudentId::new(student_id)?;
    let photo = form.into_photo(max_bytes)?;

    repo.upload_student_photo(id, &photo).await.map_err(|err| {
        log::error!("Failed to upload photo for student {student_id}: {err}");
        err.into()
    })
}

/// Renders the student ledger as CSV.
pub async fn export_ledger<R>(
    repo: &R,
    user: &AuthenticatedUser,
    student_id: i64,
) -> ServiceResult<CsvExport>
where
    R: StudentReader + InvoiceReader + PaymentReader + RefundReader + ?Sized,
{
    ensure_finance(user)?;
    let id = StudentId::new(student_id)?;

    let (student, invoices, payments, refunds) = try_join!(
        repo.get_student(id),
        repo.list_invoices(InvoiceListQuery::new().student(id)),
        repo.list_payments(PaymentListQuery::new().student(id)),
        repo.list_refunds(RefundListQuery::new().student(id)),
    )
    .map_err(|err| {
        log::error!("Failed to export ledger for student {student_id}: {err}");
        err
    })?;

    let ledger = build_ledger(&invoices, &payments, &refunds);
    let content = write_csv(
        &[
            "date",
            "kind",
            "reference",
            "description",
            "debit",
            "credit",
            "balance",
        ],
        ledger.iter().map(|entry| {
            vec![
                entry.date.format("%Y-%m-%d").to_string(),
                entry.kind.as_str().to_string(),
                entry.reference.clone(),
                entry.description.clone(),
                entry.debit.round_dp(2).to_string(),
                entry.credit.round_dp(2).to_string(),
                entry.balance.round_dp(2).to_string(),
            ]
        }),
    )?;

    Ok(CsvExport {
        filename: format!("ledger-{}.csv", student.admission_number),
        content,
    })
}
