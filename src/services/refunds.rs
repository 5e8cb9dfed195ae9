use futures_util::try_join;
use rust_decimal::Decimal;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::payment::PaymentStatus;
use crate::domain::refund::{NewRefund, Refund, RejectRefund};
use crate::domain::types::RefundId;
use crate::dto::ListQuery;
use crate::dto::finance::RefundsPageData;
use crate::forms::payments::{ReasonForm, RefundForm};
use crate::pagination::paginate;
use crate::repository::{
    PaymentListQuery, PaymentReader, RefundListQuery, RefundReader, RefundWriter,
};
use crate::services::{ServiceError, ServiceResult, ensure_admin, ensure_finance};

/// Refund list plus the completed payments a new refund can be drawn from.
pub async fn load_refunds<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ListQuery,
    per_page: usize,
) -> ServiceResult<RefundsPageData>
where
    R: RefundReader + PaymentReader + ?Sized,
{
    ensure_finance(user)?;

    let (refunds, payments) = try_join!(
        repo.list_refunds(RefundListQuery::new()),
        repo.list_payments(PaymentListQuery::new().status(PaymentStatus::Completed)),
    )
    .map_err(|err| {
        log::error!("Failed to list refunds: {err}");
        err
    })?;

    let refunds = query.filter().apply(refunds);
    let refundable_payments = payments
        .into_iter()
        .filter(|p| p.status == PaymentStatus::Completed && p.available_for_refund > Decimal::ZERO)
        .collect();

    Ok(RefundsPageData {
        refunds: paginate(refunds, query.page(), query.page_size(per_page)),
        refundable_payments,
        query,
    })
}

/// Requests a refund after checking the amount against what the payment has
/// left. The backend still enforces the bound.
pub async fn request_refund<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: RefundForm,
) -> ServiceResult<Refund>
where
    R: PaymentReader + RefundWriter + ?Sized,
{
    ensure_finance(user)?;
    let payload = NewRefund::try_from(form)?;

    let payment = repo.get_payment(payload.payment_id).await?;
    if payload.amount.get() > payment.available_for_refund {
        return Err(ServiceError::Form(format!(
            "Refund exceeds the {} available on payment {}.",
            payment.available_for_refund.round_dp(2),
            payment.reference
        )));
    }

    let refund = repo.create_refund(&payload).await.map_err(|err| {
        log::error!("Failed to request refund on payment {}: {err}", payment.reference);
        err
    })?;
    log::info!(
        "Refund {} of {} requested by {}",
        refund.id,
        refund.amount,
        user.email
    );
    Ok(refund)
}

pub async fn approve_refund<R>(
    repo: &R,
    user: &AuthenticatedUser,
    refund_id: i64,
) -> ServiceResult<Refund>
where
    R: RefundWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = RefundId::new(refund_id)?;

    let refund = repo.approve_refund(id).await.map_err(|err| {
        log::error!("Failed to approve refund {refund_id}: {err}");
        err
    })?;
    log::info!("Refund {} approved by {}", refund.id, user.email);
    Ok(refund)
}

pub async fn reject_refund<R>(
    repo: &R,
    user: &AuthenticatedUser,
    refund_id: i64,
    form: ReasonForm,
) -> ServiceResult<Refund>
where
    R: RefundWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = RefundId::new(refund_id)?;
    let payload = RejectRefund::try_from(form)?;

    let refund = repo.reject_refund(id, &payload).await.map_err(|err| {
        log::error!("Failed to reject refund {refund_id}: {err}");
        err
    })?;
    log::info!("Refund {} rejected by {}", refund.id, user.email);
    Ok(refund)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::refund::RefundStatus;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::{accountant_user, admin_user, payment, refund};

    fn form(amount: &str) -> RefundForm {
        RefundForm {
            payment_id: "4".to_string(),
            amount: amount.to_string(),
            reason: "Overpayment".to_string(),
        }
    }

    fn payment_with_available(available: i64) -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_get_payment().returning(move |_| {
            let mut p = payment(4, 1, 1000, PaymentStatus::Completed);
            p.available_for_refund = Decimal::from(available);
            Ok(p)
        });
        repo
    }

    #[actix_web::test]
    async fn list_offers_only_refundable_payments() {
        let mut repo = MockRepository::new();
        repo.expect_list_refunds()
            .returning(|_| Ok(vec![refund(1, 4, 100, RefundStatus::Pending)]));
        repo.expect_list_payments().returning(|_| {
            let mut exhausted = payment(5, 1, 300, PaymentStatus::Completed);
            exhausted.available_for_refund = Decimal::ZERO;
            Ok(vec![payment(4, 1, 1000, PaymentStatus::Completed), exhausted])
        });

        let data = load_refunds(&repo, &accountant_user(), ListQuery::default(), 20)
            .await
            .unwrap();

        assert_eq!(data.refunds.total_items, 1);
        assert_eq!(data.refundable_payments.len(), 1);
    }

    #[actix_web::test]
    async fn refund_above_available_is_rejected_locally() {
        let mut repo = payment_with_available(250);
        repo.expect_create_refund().times(0);

        let result = request_refund(&repo, &accountant_user(), form("250.01")).await;

        assert!(matches!(result, Err(ServiceError::Form(m)) if m.contains("250")));
    }

    #[actix_web::test]
    async fn refund_equal_to_available_is_sent() {
        let mut repo = payment_with_available(250);
        repo.expect_create_refund()
            .withf(|r| r.amount.get() == Decimal::from(250) && r.payment_id.get() == 4)
            .times(1)
            .returning(|_| Ok(refund(9, 4, 250, RefundStatus::Pending)));

        let created = request_refund(&repo, &accountant_user(), form("250"))
            .await
            .unwrap();

        assert_eq!(created.id.get(), 9);
    }

    #[actix_web::test]
    async fn accountants_cannot_approve_refunds() {
        let mut repo = MockRepository::new();
        repo.expect_approve_refund().times(0);

        let result = approve_refund(&repo, &accountant_user(), 9).await;

        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[actix_web::test]
    async fn admin_rejects_with_reason() {
        let mut repo = MockRepository::new();
        repo.expect_reject_refund()
            .withf(|id, r| id.get() == 9 && r.reason.as_str() == "Not eligible")
            .times(1)
            .returning(|_, _| Ok(refund(9, 4, 250, RefundStatus::Rejected)));

        let rejected = reject_refund(
            &repo,
            &admin_user(),
            9,
            ReasonForm {
                reason: "Not eligible".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(rejected.status, RefundStatus::Rejected);
    }
}
