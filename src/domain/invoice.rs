use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AcademicYear, Amount, EntityName, FeeItemId, InvoiceId, Remark, StudentId, TermName,
};

/// Lifecycle state of an invoice as reported by the backend.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    PartiallyPaid,
    Paid,
    Overdue,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl InvoiceStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::PartiallyPaid => "PARTIALLY_PAID",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Cancelled => "CANCELLED",
            InvoiceStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether the invoice still carries an amount the backend may collect.
    pub const fn is_cancellable(self) -> bool {
        matches!(
            self,
            InvoiceStatus::Draft | InvoiceStatus::Pending | InvoiceStatus::Overdue
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLine {
    #[serde(default)]
    pub fee_item_id: Option<FeeItemId>,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub student_id: StudentId,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub academic_year: Option<String>,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub paid_amount: Decimal,
    #[serde(default)]
    pub balance: Decimal,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Line item of an invoice that is about to be created.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewInvoiceLine {
    pub fee_item_id: Option<FeeItemId>,
    pub description: EntityName,
    pub amount: Amount,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewInvoice {
    pub student_id: StudentId,
    pub term: TermName,
    pub academic_year: AcademicYear,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub lines: Vec<NewInvoiceLine>,
}

impl NewInvoice {
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|line| line.amount.get()).sum()
    }
}

/// Batch request creating one invoice per student from shared line items.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BulkInvoiceRequest {
    pub student_ids: Vec<StudentId>,
    pub term: TermName,
    pub academic_year: AcademicYear,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub lines: Vec<NewInvoiceLine>,
}

/// Backend answer to a bulk invoice request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct BulkInvoiceResult {
    #[serde(default)]
    pub created: usize,
    #[serde(default)]
    pub skipped: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CancelInvoice {
    pub reason: Remark,
}
