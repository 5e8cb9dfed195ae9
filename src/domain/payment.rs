use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Amount, InvoiceId, PaymentId, Reference, Remark, StudentId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Reversed,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Reversed => "REVERSED",
            PaymentStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Mpesa,
    BankTransfer,
    Cheque,
    Card,
    #[serde(other)]
    Other,
}

impl PaymentMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Mpesa => "MPESA",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Cheque => "CHEQUE",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Other => "OTHER",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CASH" => Ok(PaymentMethod::Cash),
            "MPESA" => Ok(PaymentMethod::Mpesa),
            "BANK_TRANSFER" => Ok(PaymentMethod::BankTransfer),
            "CHEQUE" => Ok(PaymentMethod::Cheque),
            "CARD" => Ok(PaymentMethod::Card),
            _ => Err(()),
        }
    }
}

/// Portion of a payment applied to one invoice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaymentAllocation {
    pub invoice_id: InvoiceId,
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub reference: String,
    pub student_id: StudentId,
    #[serde(default)]
    pub student_name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub allocated_amount: Decimal,
    #[serde(default)]
    pub unallocated_amount: Decimal,
    #[serde(default)]
    pub available_for_refund: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_at: DateTime<Utc>,
    #[serde(default)]
    pub reversed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reversal_reason: Option<String>,
    #[serde(default)]
    pub allocations: Vec<PaymentAllocation>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewPayment {
    pub student_id: StudentId,
    pub amount: Amount,
    pub method: PaymentMethod,
    pub reference: Reference,
    pub paid_on: NaiveDate,
    /// Invoice the payment should be applied to first, when chosen.
    pub invoice_id: Option<InvoiceId>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ReversePayment {
    pub reason: Remark,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewAllocation {
    pub invoice_id: InvoiceId,
    pub amount: Amount,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AllocatePayment {
    pub allocations: Vec<NewAllocation>,
}
