use futures_util::try_join;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::expense::{Expense, NewExpense, RejectExpense};
use crate::domain::types::{BranchId, ExpenseId};
use crate::dto::ListQuery;
use crate::dto::finance::ExpensesPageData;
use crate::finance::summary::ExpenseSummary;
use crate::forms::expenses::ExpenseForm;
use crate::forms::payments::ReasonForm;
use crate::pagination::paginate;
use crate::repository::{BranchReader, ExpenseListQuery, ExpenseReader, ExpenseWriter};
use crate::services::{ServiceResult, ensure_admin, ensure_finance};

/// Expense list with totals over every row matching the filter.
pub async fn load_expenses<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ListQuery,
    per_page: usize,
) -> ServiceResult<ExpensesPageData>
where
    R: ExpenseReader + BranchReader + ?Sized,
{
    ensure_finance(user)?;

    let mut list_query = ExpenseListQuery::new();
    if let Some(id) = query.branch().and_then(|id| BranchId::new(id).ok()) {
        list_query = list_query.branch(id);
    }

    let (expenses, branches) = try_join!(repo.list_expenses(list_query), repo.list_branches())
        .map_err(|err| {
            log::error!("Failed to list expenses: {err}");
            err
        })?;

    let expenses = query.filter().apply(expenses);
    let summary = ExpenseSummary::compute(&expenses);

    Ok(ExpensesPageData {
        expenses: paginate(expenses, query.page(), query.page_size(per_page)),
        summary,
        branches,
        query,
    })
}

pub async fn record_expense<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ExpenseForm,
) -> ServiceResult<Expense>
where
    R: ExpenseWriter + ?Sized,
{
    ensure_finance(user)?;
    let payload = NewExpense::try_from(form)?;

    let expense = repo.create_expense(&payload).await.map_err(|err| {
        log::error!("Failed to record expense {}: {err}", payload.category);
        err
    })?;
    log::info!("Expense {} recorded by {}", expense.id, user.email);
    Ok(expense)
}

pub async fn approve_expense<R>(
    repo: &R,
    user: &AuthenticatedUser,
    expense_id: i64,
) -> ServiceResult<Expense>
where
    R: ExpenseWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = ExpenseId::new(expense_id)?;

    let expense = repo.approve_expense(id).await.map_err(|err| {
        log::error!("Failed to approve expense {expense_id}: {err}");
        err
    })?;
    log::info!("Expense {} approved by {}", expense.id, user.email);
    Ok(expense)
}

pub async fn reject_expense<R>(
    repo: &R,
    user: &AuthenticatedUser,
    expense_id: i64,
    form: ReasonForm,
) -> ServiceResult<Expense>
where
    R: ExpenseWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = ExpenseId::new(expense_id)?;
    let payload = RejectExpense::try_from(form)?;

    let expense = repo.reject_expense(id, &payload).await.map_err(|err| {
        log::error!("Failed to reject expense {expense_id}: {err}");
        err
    })?;
    log::info!("Expense {} rejected by {}", expense.id, user.email);
    Ok(expense)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::expense::ExpenseStatus;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::fixtures::{accountant_user, admin_user, expense};

    #[actix_web::test]
    async fn totals_follow_the_filter() {
        let mut repo = MockRepository::new();
        repo.expect_list_expenses().returning(|_| {
            Ok(vec![
                expense(1, 1000, ExpenseStatus::Approved),
                expense(2, 400, ExpenseStatus::Pending),
                expense(3, 900, ExpenseStatus::Rejected),
            ])
        });
        repo.expect_list_branches().returning(|| Ok(vec![]));

        let all = load_expenses(&repo, &accountant_user(), ListQuery::default(), 20)
            .await
            .unwrap();
        assert_eq!(all.summary.total, Decimal::from(1400));
        assert_eq!(all.summary.pending, Decimal::from(400));

        let pending = load_expenses(
            &repo,
            &accountant_user(),
            ListQuery {
                status: Some("PENDING".to_string()),
                ..ListQuery::default()
            },
            20,
        )
        .await
        .unwrap();
        assert_eq!(pending.expenses.total_items, 1);
        assert_eq!(pending.summary.approved, Decimal::ZERO);
    }

    #[actix_web::test]
    async fn accountant_records_but_cannot_approve() {
        let mut repo = MockRepository::new();
        repo.expect_create_expense()
            .withf(|e| e.amount.get() == Decimal::from(2500) && e.category.as_str() == "Repairs")
            .times(1)
            .returning(|_| Ok(expense(7, 2500, ExpenseStatus::Pending)));
        repo.expect_approve_expense().times(0);

        let form = ExpenseForm {
            category: "Repairs".to_string(),
            description: "Roof <b>gutter</b>".to_string(),
            amount: "2,500".to_string(),
            incurred_on: "2025-03-04".to_string(),
            vendor: String::new(),
            reference: String::new(),
            branch_id: String::new(),
        };
        record_expense(&repo, &accountant_user(), form).await.unwrap();

        let result = approve_expense(&repo, &accountant_user(), 7).await;
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[actix_web::test]
    async fn admin_rejects_expense() {
        let mut repo = MockRepository::new();
        repo.expect_reject_expense()
            .times(1)
            .returning(|_, _| Ok(expense(7, 2500, ExpenseStatus::Rejected)));

        let rejected = reject_expense(
            &repo,
            &admin_user(),
            7,
            ReasonForm {
                reason: "No receipt".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(rejected.status, ExpenseStatus::Rejected);
    }
}
