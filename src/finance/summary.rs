//! Totals shown on finance pages, derived from already-fetched rows.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::expense::{Expense, ExpenseStatus};
use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::payment::{Payment, PaymentStatus};

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct FinanceSummary {
    pub total_invoiced: Decimal,
    pub total_allocated: Decimal,
    pub outstanding_balance: Decimal,
    pub total_received: Decimal,
    pub total_unallocated: Decimal,
    pub pending_amount: Decimal,
    pub invoice_count: usize,
    pub payment_count: usize,
}

impl FinanceSummary {
    pub fn compute(invoices: &[Invoice], payments: &[Payment]) -> Self {
        let billable = invoices
            .iter()
            .filter(|invoice| invoice.status != InvoiceStatus::Cancelled);

        let (invoice_count, total_invoiced, total_allocated) = billable.fold(
            (0usize, Decimal::ZERO, Decimal::ZERO),
            |(count, invoiced, allocated), invoice| {
                (
                    count + 1,
                    invoiced + invoice.total_amount,
                    allocated + invoice.paid_amount,
                )
            },
        );

        let received: Vec<&Payment> = payments
            .iter()
            .filter(|payment| payment.status != PaymentStatus::Reversed)
            .collect();

        let total_received: Decimal = received.iter().map(|payment| payment.amount).sum();

        let total_unallocated: Decimal = payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Completed)
            .map(|payment| payment.unallocated_amount)
            .sum();

        let pending_amount: Decimal = payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Pending)
            .map(|payment| payment.amount)
            .sum();

        Self {
            total_invoiced,
            total_allocated,
            outstanding_balance: total_invoiced - total_allocated,
            total_received,
            total_unallocated,
            pending_amount,
            invoice_count,
            payment_count: received.len(),
        }
    }
}

/// Expense totals by approval state.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct ExpenseSummary {
    pub total: Decimal,
    pub approved: Decimal,
    pub pending: Decimal,
}

impl ExpenseSummary {
    pub fn compute(expenses: &[Expense]) -> Self {
        expenses
            .iter()
            .filter(|expense| expense.status != ExpenseStatus::Rejected)
            .fold(Self::default(), |mut summary, expense| {
                summary.total += expense.amount;
                match expense.status {
                    ExpenseStatus::Approved | ExpenseStatus::Paid => {
                        summary.approved += expense.amount
                    }
                    ExpenseStatus::Pending => summary.pending += expense.amount,
                    _ => {}
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::domain::payment::PaymentMethod;
    use crate::domain::types::{ExpenseId, InvoiceId, PaymentId, StudentId};

    fn invoice(total: i64, paid: i64, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: InvoiceId::new(1).unwrap(),
            invoice_number: "INV-1".to_string(),
            student_id: StudentId::new(1).unwrap(),
            student_name: String::new(),
            term: None,
            academic_year: None,
            issue_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            due_date: None,
            total_amount: Decimal::from(total),
            paid_amount: Decimal::from(paid),
            balance: Decimal::from(total - paid),
            status,
            lines: vec![],
            cancellation_reason: None,
            created_at: None,
        }
    }

    fn payment(amount: i64, unallocated: i64, status: PaymentStatus) -> Payment {
        Payment {
            id: PaymentId::new(1).unwrap(),
            reference: "P-1".to_string(),
            student_id: StudentId::new(1).unwrap(),
            student_name: String::new(),
            amount: Decimal::from(amount),
            allocated_amount: Decimal::from(amount - unallocated),
            unallocated_amount: Decimal::from(unallocated),
            available_for_refund: Decimal::ZERO,
            method: PaymentMethod::Cash,
            status,
            paid_at: Utc.with_ymd_and_hms(2025, 1, 11, 10, 0, 0).unwrap(),
            reversed_at: None,
            reversal_reason: None,
            allocations: vec![],
        }
    }

    #[test]
    fn cancelled_invoices_do_not_count_towards_totals() {
        let invoices = vec![
            invoice(1000, 1000, InvoiceStatus::Paid),
            invoice(500, 0, InvoiceStatus::Cancelled),
        ];
        let payments = vec![payment(1000, 0, PaymentStatus::Completed)];

        let summary = FinanceSummary::compute(&invoices, &payments);

        assert_eq!(summary.total_invoiced, Decimal::from(1000));
        assert_eq!(summary.total_received, Decimal::from(1000));
        assert_eq!(summary.outstanding_balance, Decimal::ZERO);
        assert_eq!(summary.invoice_count, 1);
    }

    #[test]
    fn outstanding_is_invoiced_minus_allocated() {
        let invoices = vec![
            invoice(1200, 200, InvoiceStatus::PartiallyPaid),
            invoice(800, 0, InvoiceStatus::Overdue),
        ];

        let summary = FinanceSummary::compute(&invoices, &[]);

        assert_eq!(summary.total_invoiced, Decimal::from(2000));
        assert_eq!(summary.total_allocated, Decimal::from(200));
        assert_eq!(summary.outstanding_balance, Decimal::from(1800));
    }

    #[test]
    fn reversed_payments_are_excluded_from_received() {
        let payments = vec![
            payment(1000, 300, PaymentStatus::Completed),
            payment(700, 0, PaymentStatus::Reversed),
            payment(250, 250, PaymentStatus::Pending),
        ];

        let summary = FinanceSummary::compute(&[], &payments);

        assert_eq!(summary.total_received, Decimal::from(1250));
        assert_eq!(summary.total_unallocated, Decimal::from(300));
        assert_eq!(summary.pending_amount, Decimal::from(250));
        assert_eq!(summary.payment_count, 2);
    }

    #[test]
    fn expense_summary_ignores_rejected() {
        let expense = |amount: i64, status: ExpenseStatus| Expense {
            id: ExpenseId::new(1).unwrap(),
            category: "Utilities".to_string(),
            description: "Water".to_string(),
            amount: Decimal::from(amount),
            status,
            incurred_on: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            vendor: None,
            reference: None,
            branch_id: None,
        };
        let expenses = vec![
            expense(100, ExpenseStatus::Approved),
            expense(40, ExpenseStatus::Pending),
            expense(999, ExpenseStatus::Rejected),
            expense(60, ExpenseStatus::Paid),
        ];

        let summary = ExpenseSummary::compute(&expenses);

        assert_eq!(summary.total, Decimal::from(200));
        assert_eq!(summary.approved, Decimal::from(160));
        assert_eq!(summary.pending, Decimal::from(40));
    }
}
