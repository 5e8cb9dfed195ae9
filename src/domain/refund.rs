use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Amount, PaymentId, RefundId, Remark, StudentId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    #[serde(other)]
    Unknown,
}

impl RefundStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RefundStatus::Pending => "PENDING",
            RefundStatus::Approved => "APPROVED",
            RefundStatus::Rejected => "REJECTED",
            RefundStatus::Completed => "COMPLETED",
            RefundStatus::Unknown => "UNKNOWN",
        }
    }

    /// Approved and completed refunds have left the school's books.
    pub const fn is_effective(self) -> bool {
        matches!(self, RefundStatus::Approved | RefundStatus::Completed)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Refund {
    pub id: RefundId,
    pub payment_id: PaymentId,
    #[serde(default)]
    pub payment_reference: Option<String>,
    pub student_id: StudentId,
    #[serde(default)]
    pub student_name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: RefundStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewRefund {
    pub payment_id: PaymentId,
    pub amount: Amount,
    pub reason: Remark,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RejectRefund {
    pub reason: Remark,
}
