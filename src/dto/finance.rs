use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::expense::Expense;
use crate::domain::fee_item::{FeeCategory, FeeItem};
use crate::domain::invoice::Invoice;
use crate::domain::payment::Payment;
use crate::domain::refund::Refund;
use crate::domain::school::{BranchProfile, Classroom};
use crate::domain::student::Student;
use crate::domain::types::StudentId;
use crate::dto::ListQuery;
use crate::finance::fees::ResolvedFeeLine;
use crate::finance::summary::{ExpenseSummary, FinanceSummary};
use crate::pagination::Paginated;

#[derive(Serialize)]
pub struct FeeItemsPageData {
    pub fee_items: Vec<FeeItem>,
    pub categories: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct InvoicesPageData {
    pub invoices: Paginated<Invoice>,
    /// Totals over every invoice matching the filter, not just this page.
    pub summary: FinanceSummary,
    pub students: Vec<Student>,
    pub query: ListQuery,
}

#[derive(Serialize)]
pub struct InvoicePageData {
    pub invoice: Invoice,
    /// Completed payments of the same student with money left to allocate.
    pub allocatable_payments: Vec<Payment>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BulkPreviewRow {
    pub student_id: StudentId,
    pub admission_number: String,
    pub name: String,
    pub total: Decimal,
}

/// Per-student invoice lines and totals before a bulk invoice is submitted.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BulkInvoicePreview {
    pub classroom: Classroom,
    pub term: String,
    pub academic_year: String,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub lines: Vec<ResolvedFeeLine>,
    pub rows: Vec<BulkPreviewRow>,
    pub per_student_total: Decimal,
    pub grand_total: Decimal,
}

#[derive(Serialize)]
pub struct BulkInvoicePageData {
    pub classrooms: Vec<Classroom>,
    pub fee_items: Vec<FeeItem>,
    pub preview: Option<BulkInvoicePreview>,
}

#[derive(Serialize)]
pub struct PaymentsPageData {
    pub payments: Paginated<Payment>,
    pub summary: FinanceSummary,
    pub students: Vec<Student>,
    pub methods: Vec<&'static str>,
    pub query: ListQuery,
}

#[derive(Serialize)]
pub struct PaymentPageData {
    pub payment: Payment,
    pub refunds: Vec<Refund>,
    /// Open invoices of the same student the payment can be allocated to.
    pub open_invoices: Vec<Invoice>,
}

#[derive(Serialize)]
pub struct RefundsPageData {
    pub refunds: Paginated<Refund>,
    /// Payments that still have money available for a refund.
    pub refundable_payments: Vec<Payment>,
    pub query: ListQuery,
}

#[derive(Serialize)]
pub struct ExpensesPageData {
    pub expenses: Paginated<Expense>,
    /// Totals over every expense matching the filter.
    pub summary: ExpenseSummary,
    pub branches: Vec<BranchProfile>,
    pub query: ListQuery,
}

impl FeeItemsPageData {
    pub fn new(fee_items: Vec<FeeItem>) -> Self {
        Self {
            fee_items,
            categories: FeeCategory::ALL.iter().map(|c| c.as_str()).collect(),
        }
    }
}
