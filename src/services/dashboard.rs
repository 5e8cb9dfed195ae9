//! Dashboard: head counts, finance summary and the latest activity.

use futures_util::try_join;

use crate::ADMIN_ROLE;
use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::dto::main::{DashboardPageData, RECENT_ROWS};
use crate::finance::summary::FinanceSummary;
use crate::repository::{
    InvoiceListQuery, InvoiceReader, PaymentListQuery, PaymentReader, StaffListQuery,
    StaffReader, StudentListQuery, StudentReader,
};
use crate::services::{ServiceResult, ensure_finance};

/// Loads every dashboard widget in parallel; the first failure aborts the page.
pub async fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardPageData>
where
    R: StudentReader + StaffReader + InvoiceReader + PaymentReader + ?Sized,
{
    ensure_finance(user)?;

    let is_admin = check_role(ADMIN_ROLE, &user.roles);
    let staff = async {
        if is_admin {
            repo.list_staff(StaffListQuery::new()).await
        } else {
            Ok(Vec::new())
        }
    };

    let (students, staff, mut invoices, mut payments) = try_join!(
        repo.list_students(StudentListQuery::new()),
        staff,
        repo.list_invoices(InvoiceListQuery::new()),
        repo.list_payments(PaymentListQuery::new()),
    )
    .map_err(|err| {
        log::error!("Failed to load dashboard: {err}");
        err
    })?;

    let summary = FinanceSummary::compute(&invoices, &payments);

    invoices.sort_by(|a, b| b.issue_date.cmp(&a.issue_date).then(b.id.cmp(&a.id)));
    invoices.truncate(RECENT_ROWS);
    payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at).then(b.id.cmp(&a.id)));
    payments.truncate(RECENT_ROWS);

    Ok(DashboardPageData {
        student_count: students.len(),
        staff_count: staff.len(),
        summary,
        recent_invoices: invoices,
        recent_payments: payments,
    })
}
