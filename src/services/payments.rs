//! Payments: list with totals, detail, recording, approval, reversal and
//! allocation to invoices.

use std::collections::HashSet;

use futures_util::try_join;
use rust_decimal::Decimal;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::invoice::InvoiceStatus;
use crate::domain::payment::{
    AllocatePayment, NewPayment, Payment, PaymentMethod, PaymentStatus, ReversePayment,
};
use crate::domain::student::StudentStatus;
use crate::domain::types::PaymentId;
use crate::dto::ListQuery;
use crate::dto::finance::{PaymentPageData, PaymentsPageData};
use crate::finance::summary::FinanceSummary;
use crate::forms::payments::{AllocatePaymentForm, PaymentForm, ReasonForm};
use crate::pagination::paginate;
use crate::repository::{
    InvoiceListQuery, InvoiceReader, PaymentListQuery, PaymentReader, PaymentWriter,
    RefundListQuery, RefundReader, StudentListQuery, StudentReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_admin, ensure_finance};

const METHODS: [PaymentMethod; 5] = [
    PaymentMethod::Cash,
    PaymentMethod::Mpesa,
    PaymentMethod::BankTransfer,
    PaymentMethod::Cheque,
    PaymentMethod::Card,
];

/// Payment list with totals over the rows matching the filter.
///
/// The invoice side of the summary follows the students of the filtered
/// payments when a filter is active.
pub async fn load_payments<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ListQuery,
    per_page: usize,
) -> ServiceResult<PaymentsPageData>
where
    R: PaymentReader + InvoiceReader + StudentReader + ?Sized,
{
    ensure_finance(user)?;

    let (payments, invoices, students) = try_join!(
        repo.list_payments(PaymentListQuery::new()),
        repo.list_invoices(InvoiceListQuery::new()),
        repo.list_students(StudentListQuery::new().status(StudentStatus::Active)),
    )
    .map_err(|err| {
        log::error!("Failed to list payments: {err}");
        err
    })?;

    let filter = query.filter();
    let filtered = !filter.is_empty();
    let payments = filter.apply(payments);

    let invoices = if filtered {
        let student_ids: HashSet<_> = payments.iter().map(|p| p.student_id).collect();
        invoices
            .into_iter()
            .filter(|i| student_ids.contains(&i.student_id))
            .collect()
    } else {
        invoices
    };
    let summary = FinanceSummary::compute(&invoices, &payments);

    Ok(PaymentsPageData {
        payments: paginate(payments, query.page(), query.page_size(per_page)),
        summary,
        students,
        methods: METHODS.iter().map(|m| m.as_str()).collect(),
        query,
    })
}

/// Payment detail with its refunds and the student's open invoices.
pub async fn load_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payment_id: i64,
) -> ServiceResult<PaymentPageData>
where
    R: PaymentReader + RefundReader + InvoiceReader + ?Sized,
{
    ensure_finance(user)?;
    let id = PaymentId::new(payment_id)?;

    let (payment, refunds) = try_join!(
        repo.get_payment(id),
        repo.list_refunds(RefundListQuery::new().payment(id)),
    )
    .map_err(|err| {
        log::error!("Failed to load payment {payment_id}: {err}");
        err
    })?;

    let invoices = repo
        .list_invoices(InvoiceListQuery::new().student(payment.student_id))
        .await
        .map_err(|err| {
            log::error!("Failed to load invoices for payment {payment_id}: {err}");
            err
        })?;
    let open_invoices = invoices
        .into_iter()
        .filter(|i| i.status != InvoiceStatus::Cancelled && i.balance > Decimal::ZERO)
        .collect();

    Ok(PaymentPageData {
        payment,
        refunds,
        open_invoices,
    })
}

pub async fn record_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: PaymentForm,
) -> ServiceResult<Payment>
where
    R: PaymentWriter + ?Sized,
{
    ensure_finance(user)?;
    let payload = NewPayment::try_from(form)?;

    let payment = repo.create_payment(&payload).await.map_err(|err| {
        log::error!("Failed to record payment {}: {err}", payload.reference);
        err
    })?;
    log::info!(
        "Payment {} of {} recorded by {}",
        payment.reference,
        payment.amount,
        user.email
    );
    Ok(payment)
}

pub async fn approve_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payment_id: i64,
) -> ServiceResult<Payment>
where
    R: PaymentWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = PaymentId::new(payment_id)?;

    let payment = repo.approve_payment(id).await.map_err(|err| {
        log::error!("Failed to approve payment {payment_id}: {err}");
        err
    })?;
    log::info!("Payment {} approved by {}", payment.reference, user.email);
    Ok(payment)
}

pub async fn reverse_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payment_id: i64,
    form: ReasonForm,
) -> ServiceResult<Payment>
where
    R: PaymentWriter + ?Sized,
{
    ensure_finance(user)?;
    let id = PaymentId::new(payment_id)?;
    let payload = ReversePayment::try_from(form)?;

    let payment = repo.reverse_payment(id, &payload).await.map_err(|err| {
        log::error!("Failed to reverse payment {payment_id}: {err}");
        err
    })?;
    log::info!("Payment {} reversed by {}", payment.reference, user.email);
    Ok(payment)
}

/// Applies part of the unallocated amount to an invoice.
pub async fn allocate_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payment_id: i64,
    form: AllocatePaymentForm,
) -> ServiceResult<Payment>
where
    R: PaymentReader + PaymentWriter + ?Sized,
{
    ensure_finance(user)?;
    let id = PaymentId::new(payment_id)?;
    let payload = AllocatePayment::try_from(form)?;

    let current = repo.get_payment(id).await?;
    let requested: Decimal = payload.allocations.iter().map(|a| a.amount.get()).sum();
    if current.status != PaymentStatus::Completed {
        return Err(ServiceError::Form(
            "Only completed payments can be allocated.".to_string(),
        ));
    }
    if requested > current.unallocated_amount {
        return Err(ServiceError::Form(format!(
            "Only {} of payment {} is unallocated.",
            current.unallocated_amount.round_dp(2),
            current.reference
        )));
    }

    repo.allocate_payment(id, &payload).await.map_err(|err| {
        log::error!("Failed to allocate payment {payment_id}: {err}");
        err.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::refund::RefundStatus;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::{accountant_user, admin_user, invoice, payment, refund};

    fn allocation(amount: &str) -> AllocatePaymentForm {
        AllocatePaymentForm {
            invoice_id: "3".to_string(),
            amount: amount.to_string(),
        }
    }

    #[actix_web::test]
    async fn list_applies_amount_range() {
        let mut repo = MockRepository::new();
        repo.expect_list_payments().returning(|_| {
            Ok(vec![
                payment(1, 1, 500, PaymentStatus::Completed),
                payment(2, 2, 5000, PaymentStatus::Completed),
            ])
        });
        repo.expect_list_invoices()
            .returning(|_| Ok(vec![invoice(1, 1, 800, 500, InvoiceStatus::PartiallyPaid)]));
        repo.expect_list_students().returning(|_| Ok(vec![]));

        let query = ListQuery {
            min_amount: Some("1000".to_string()),
            ..ListQuery::default()
        };
        let data = load_payments(&repo, &accountant_user(), query, 20)
            .await
            .unwrap();

        assert_eq!(data.payments.total_items, 1);
        assert_eq!(data.summary.total_received, Decimal::from(5000));
        assert_eq!(data.summary.total_invoiced, Decimal::ZERO);
        assert_eq!(data.methods, vec!["CASH", "MPESA", "BANK_TRANSFER", "CHEQUE", "CARD"]);
    }

    #[actix_web::test]
    async fn detail_shows_refunds_and_open_invoices() {
        let mut repo = MockRepository::new();
        repo.expect_get_payment()
            .returning(|_| Ok(payment(4, 1, 1000, PaymentStatus::Completed)));
        repo.expect_list_refunds()
            .withf(|q| q.payment_id.map(|id| id.get()) == Some(4))
            .returning(|_| Ok(vec![refund(1, 4, 200, RefundStatus::Pending)]));
        repo.expect_list_invoices().returning(|_| {
            Ok(vec![
                invoice(1, 1, 800, 800, InvoiceStatus::Paid),
                invoice(2, 1, 800, 0, InvoiceStatus::Pending),
                invoice(3, 1, 800, 0, InvoiceStatus::Cancelled),
            ])
        });

        let data = load_payment(&repo, &accountant_user(), 4).await.unwrap();

        assert_eq!(data.refunds.len(), 1);
        assert_eq!(data.open_invoices.len(), 1);
        assert_eq!(data.open_invoices[0].id.get(), 2);
    }

    #[actix_web::test]
    async fn approval_is_admin_only() {
        let mut repo = MockRepository::new();
        repo.expect_approve_payment().times(0);

        let result = approve_payment(&repo, &accountant_user(), 4).await;

        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[actix_web::test]
    async fn admin_approves() {
        let mut repo = MockRepository::new();
        repo.expect_approve_payment()
            .withf(|id| id.get() == 4)
            .times(1)
            .returning(|_| Ok(payment(4, 1, 1000, PaymentStatus::Completed)));

        let approved = approve_payment(&repo, &admin_user(), 4).await.unwrap();

        assert_eq!(approved.status, PaymentStatus::Completed);
    }

    #[actix_web::test]
    async fn reversal_needs_a_reason() {
        let mut repo = MockRepository::new();
        repo.expect_reverse_payment().times(0);

        let result = reverse_payment(
            &repo,
            &accountant_user(),
            4,
            ReasonForm {
                reason: "   ".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn allocation_above_unallocated_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_payment().returning(|_| {
            let mut p = payment(4, 1, 1000, PaymentStatus::Completed);
            p.unallocated_amount = Decimal::from(300);
            Ok(p)
        });
        repo.expect_allocate_payment().times(0);

        let result = allocate_payment(&repo, &accountant_user(), 4, allocation("300.01")).await;

        assert!(matches!(result, Err(ServiceError::Form(m)) if m.contains("300")));
    }

    #[actix_web::test]
    async fn allocation_within_bounds_is_forwarded() {
        let mut repo = MockRepository::new();
        repo.expect_get_payment()
            .returning(|_| Ok(payment(4, 1, 1000, PaymentStatus::Completed)));
        repo.expect_allocate_payment()
            .withf(|id, a| id.get() == 4 && a.allocations[0].invoice_id.get() == 3)
            .times(1)
            .returning(|_, _| Ok(payment(4, 1, 1000, PaymentStatus::Completed)));

        allocate_payment(&repo, &accountant_user(), 4, allocation("1,000"))
            .await
            .unwrap();
    }
}
