use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Amount, BranchId, EntityName, ExpenseId, Remark};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
    #[serde(other)]
    Unknown,
}

impl ExpenseStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "PENDING",
            ExpenseStatus::Approved => "APPROVED",
            ExpenseStatus::Rejected => "REJECTED",
            ExpenseStatus::Paid => "PAID",
            ExpenseStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub status: ExpenseStatus,
    pub incurred_on: NaiveDate,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewExpense {
    pub category: EntityName,
    pub description: Remark,
    pub amount: Amount,
    pub incurred_on: NaiveDate,
    pub vendor: Option<String>,
    pub reference: Option<String>,
    pub branch_id: Option<BranchId>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RejectExpense {
    pub reason: Remark,
}
