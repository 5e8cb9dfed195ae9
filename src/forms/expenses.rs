use serde::Deserialize;

use crate::domain::expense::{NewExpense, RejectExpense};
use crate::domain::types::{Amount, EntityName, Remark};
use crate::forms::payments::ReasonForm;
use crate::forms::{FormError, optional_text, parse_date, parse_optional_id};

#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    pub category: String,
    pub description: String,
    pub amount: String,
    pub incurred_on: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub branch_id: String,
}

impl TryFrom<ExpenseForm> for NewExpense {
    type Error = FormError;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        Ok(Self {
            category: EntityName::new(form.category).map_err(|_| FormError::Missing("category"))?,
            description: Remark::new(form.description)
                .map_err(|_| FormError::Missing("description"))?,
            amount: Amount::parse(&form.amount).map_err(|_| FormError::InvalidAmount)?,
            incurred_on: parse_date(&form.incurred_on, "expense date")?,
            vendor: optional_text(&form.vendor),
            reference: optional_text(&form.reference),
            branch_id: parse_optional_id(&form.branch_id, "branch")?,
        })
    }
}

impl TryFrom<ReasonForm> for RejectExpense {
    type Error = FormError;

    fn try_from(form: ReasonForm) -> Result<Self, Self::Error> {
        Ok(Self {
            reason: Remark::new(form.reason).map_err(|_| FormError::Missing("reason"))?,
        })
    }
}
