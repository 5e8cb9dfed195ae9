//! Student ledger: a date-ordered list of invoice, payment, refund and
//! reversal events with a running balance.
//!
//! The ledger is an audit view only. Balances shown here are recomputed from
//! the fetched rows and never sent back to the backend.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::refund::Refund;

/// Kind of ledger event. Declaration order is the tie-break order for events
/// sharing a timestamp.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEntryKind {
    Invoice,
    Payment,
    Refund,
    Reversal,
}

impl LedgerEntryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            LedgerEntryKind::Invoice => "INVOICE",
            LedgerEntryKind::Payment => "PAYMENT",
            LedgerEntryKind::Refund => "REFUND",
            LedgerEntryKind::Reversal => "REVERSAL",
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LedgerEntry {
    pub date: DateTime<Utc>,
    pub kind: LedgerEntryKind,
    pub reference: String,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn entry(
    date: DateTime<Utc>,
    kind: LedgerEntryKind,
    reference: String,
    description: String,
    debit: Decimal,
    credit: Decimal,
) -> LedgerEntry {
    LedgerEntry {
        date,
        kind,
        reference,
        description,
        debit,
        credit,
        balance: Decimal::ZERO,
    }
}

/// Builds the ledger rows for one student.
///
/// * non-cancelled invoices are debited on their issue date;
/// * completed and reversed payments are credited on the payment date;
/// * reversed payments add a reversal debit on the reversal date;
/// * approved and completed refunds are debited on the processing date.
pub fn build_ledger(invoices: &[Invoice], payments: &[Payment], refunds: &[Refund]) -> Vec<LedgerEntry> {
    let mut entries = Vec::with_capacity(invoices.len() + payments.len() + refunds.len());

    for invoice in invoices
        .iter()
        .filter(|invoice| invoice.status != InvoiceStatus::Cancelled)
    {
        let description = match (&invoice.term, &invoice.academic_year) {
            (Some(term), Some(year)) => format!("Invoice {term} {year}"),
            _ => "Invoice".to_string(),
        };
        entries.push(entry(
            start_of_day(invoice.issue_date),
            LedgerEntryKind::Invoice,
            invoice.invoice_number.clone(),
            description,
            invoice.total_amount,
            Decimal::ZERO,
        ));
    }

    for payment in payments.iter().filter(|payment| {
        matches!(
            payment.status,
            PaymentStatus::Completed | PaymentStatus::Reversed
        )
    }) {
        entries.push(entry(
            payment.paid_at,
            LedgerEntryKind::Payment,
            payment.reference.clone(),
            format!("Payment ({})", payment.method.as_str()),
            Decimal::ZERO,
            payment.amount,
        ));

        if payment.status == PaymentStatus::Reversed {
            let description = payment
                .reversal_reason
                .as_deref()
                .map(|reason| format!("Reversal: {reason}"))
                .unwrap_or_else(|| "Reversal".to_string());
            entries.push(entry(
                payment.reversed_at.unwrap_or(payment.paid_at),
                LedgerEntryKind::Reversal,
                payment.reference.clone(),
                description,
                payment.amount,
                Decimal::ZERO,
            ));
        }
    }

    for refund in refunds.iter().filter(|refund| refund.status.is_effective()) {
        let reference = refund
            .payment_reference
            .clone()
            .unwrap_or_else(|| format!("REF-{}", refund.id));
        let description = refund
            .reason
            .as_deref()
            .map(|reason| format!("Refund: {reason}"))
            .unwrap_or_else(|| "Refund".to_string());
        entries.push(entry(
            refund.processed_at.unwrap_or(refund.created_at),
            LedgerEntryKind::Refund,
            reference,
            description,
            refund.amount,
            Decimal::ZERO,
        ));
    }

    entries.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.kind.cmp(&b.kind))
            .then_with(|| a.reference.cmp(&b.reference))
    });

    let mut balance = Decimal::ZERO;
    for entry in &mut entries {
        balance += entry.debit - entry.credit;
        entry.balance = balance;
    }

    entries
}

/// Balance after the last ledger row, zero for an empty ledger.
pub fn closing_balance(entries: &[LedgerEntry]) -> Decimal {
    entries
        .last()
        .map(|entry| entry.balance)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::payment::PaymentMethod;
    use crate::domain::refund::RefundStatus;
    use crate::domain::types::{InvoiceId, PaymentId, RefundId, StudentId};

    fn ksh(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn invoice(id: i64, number: &str, day: u32, total: i64, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: InvoiceId::new(id).unwrap(),
            invoice_number: number.to_string(),
            student_id: StudentId::new(1).unwrap(),
            student_name: "Wanjiru Kamau".to_string(),
            term: Some("Term 1".to_string()),
            academic_year: Some("2025".to_string()),
            issue_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            due_date: None,
            total_amount: ksh(total),
            paid_amount: Decimal::ZERO,
            balance: ksh(total),
            status,
            lines: vec![],
            cancellation_reason: None,
            created_at: None,
        }
    }

    fn payment(id: i64, reference: &str, day: u32, amount: i64, status: PaymentStatus) -> Payment {
        Payment {
            id: PaymentId::new(id).unwrap(),
            reference: reference.to_string(),
            student_id: StudentId::new(1).unwrap(),
            student_name: "Wanjiru Kamau".to_string(),
            amount: ksh(amount),
            allocated_amount: ksh(amount),
            unallocated_amount: Decimal::ZERO,
            available_for_refund: ksh(amount),
            method: PaymentMethod::Mpesa,
            status,
            paid_at: Utc.with_ymd_and_hms(2025, 1, day, 9, 30, 0).unwrap(),
            reversed_at: None,
            reversal_reason: None,
            allocations: vec![],
        }
    }

    fn refund(id: i64, day: u32, amount: i64, status: RefundStatus) -> Refund {
        Refund {
            id: RefundId::new(id).unwrap(),
            payment_id: PaymentId::new(1).unwrap(),
            payment_reference: Some("RF-1".to_string()),
            student_id: StudentId::new(1).unwrap(),
            student_name: String::new(),
            amount: ksh(amount),
            reason: None,
            status,
            created_at: Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap(),
            processed_at: None,
        }
    }

    #[test]
    fn running_balance_accumulates_debits_minus_credits_in_date_order() {
        let invoices = vec![
            invoice(2, "INV-002", 20, 500, InvoiceStatus::Pending),
            invoice(1, "INV-001", 5, 1000, InvoiceStatus::Paid),
        ];
        let payments = vec![payment(1, "QX12", 10, 1000, PaymentStatus::Completed)];

        let ledger = build_ledger(&invoices, &payments, &[]);

        let rows: Vec<_> = ledger
            .iter()
            .map(|e| (e.reference.as_str(), e.balance))
            .collect();
        assert_eq!(
            rows,
            vec![("INV-001", ksh(1000)), ("QX12", ksh(0)), ("INV-002", ksh(500))]
        );
        assert_eq!(closing_balance(&ledger), ksh(500));
    }

    #[test]
    fn cancelled_invoices_and_unsettled_payments_are_left_out() {
        let invoices = vec![
            invoice(1, "INV-001", 5, 1000, InvoiceStatus::Paid),
            invoice(2, "INV-002", 6, 500, InvoiceStatus::Cancelled),
        ];
        let payments = vec![
            payment(1, "P-OK", 7, 1000, PaymentStatus::Completed),
            payment(2, "P-PEND", 8, 300, PaymentStatus::Pending),
            payment(3, "P-FAIL", 8, 300, PaymentStatus::Failed),
        ];

        let ledger = build_ledger(&invoices, &payments, &[]);

        assert_eq!(ledger.len(), 2);
        assert_eq!(closing_balance(&ledger), Decimal::ZERO);
    }

    #[test]
    fn reversed_payment_credits_then_debits_back() {
        let mut reversed = payment(1, "P-REV", 10, 800, PaymentStatus::Reversed);
        reversed.reversed_at = Some(Utc.with_ymd_and_hms(2025, 1, 12, 8, 0, 0).unwrap());
        reversed.reversal_reason = Some("Bounced cheque".to_string());
        let invoices = vec![invoice(1, "INV-001", 1, 800, InvoiceStatus::Pending)];

        let ledger = build_ledger(&invoices, &[reversed], &[]);

        let kinds: Vec<_> = ledger.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LedgerEntryKind::Invoice,
                LedgerEntryKind::Payment,
                LedgerEntryKind::Reversal
            ]
        );
        assert_eq!(ledger[1].balance, Decimal::ZERO);
        assert_eq!(ledger[2].balance, ksh(800));
        assert_eq!(ledger[2].description, "Reversal: Bounced cheque");
    }

    #[test]
    fn only_effective_refunds_are_debited() {
        let payments = vec![payment(1, "P-1", 2, 1000, PaymentStatus::Completed)];
        let refunds = vec![
            refund(1, 3, 200, RefundStatus::Approved),
            refund(2, 4, 100, RefundStatus::Pending),
            refund(3, 5, 50, RefundStatus::Rejected),
        ];

        let ledger = build_ledger(&[], &payments, &refunds);

        assert_eq!(ledger.len(), 2);
        assert_eq!(closing_balance(&ledger), ksh(-800));
    }

    #[test]
    fn same_day_events_order_invoice_before_payment() {
        let mut same_day = payment(1, "P-1", 5, 1000, PaymentStatus::Completed);
        same_day.paid_at = Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap();
        let invoices = vec![invoice(1, "INV-001", 5, 1000, InvoiceStatus::Paid)];

        let ledger = build_ledger(&invoices, &[same_day], &[]);

        assert_eq!(ledger[0].kind, LedgerEntryKind::Invoice);
        assert_eq!(ledger[0].balance, ksh(1000));
        assert_eq!(ledger[1].balance, Decimal::ZERO);
    }

    #[test]
    fn rebuilding_from_the_same_rows_is_deterministic() {
        let invoices = vec![
            invoice(1, "INV-B", 5, 700, InvoiceStatus::Pending),
            invoice(2, "INV-A", 5, 300, InvoiceStatus::Pending),
        ];
        let payments = vec![payment(1, "P-1", 6, 400, PaymentStatus::Completed)];

        let first = build_ledger(&invoices, &payments, &[]);
        let reversed_input: Vec<_> = invoices.iter().rev().cloned().collect();
        let second = build_ledger(&reversed_input, &payments, &[]);

        assert_eq!(first, second);
        assert_eq!(first[0].reference, "INV-A");
    }
}
