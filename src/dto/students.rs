use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::invoice::Invoice;
use crate::domain::payment::Payment;
use crate::domain::refund::Refund;
use crate::domain::school::{BranchProfile, Classroom};
use crate::domain::student::Student;
use crate::dto::ListQuery;
use crate::finance::ledger::LedgerEntry;
use crate::finance::summary::FinanceSummary;
use crate::pagination::Paginated;

#[derive(Serialize)]
pub struct StudentsPageData {
    pub students: Paginated<Student>,
    pub classrooms: Vec<Classroom>,
    pub branches: Vec<BranchProfile>,
    pub query: ListQuery,
}

/// Student profile with the finance history used by the detail page.
#[derive(Serialize)]
pub struct StudentPageData {
    pub student: Student,
    pub invoices: Vec<Invoice>,
    pub payments: Vec<Payment>,
    pub refunds: Vec<Refund>,
    pub summary: FinanceSummary,
    pub ledger: Vec<LedgerEntry>,
    pub closing_balance: Decimal,
    pub classrooms: Vec<Classroom>,
    pub branches: Vec<BranchProfile>,
}
