use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::invoice::{CancelInvoice, NewInvoice, NewInvoiceLine};
use crate::domain::types::{
    AcademicYear, Amount, ClassroomId, EntityName, FeeItemId, Remark, TermName,
};
use crate::forms::{
    FormError, optional_text, parse_date, parse_id, parse_optional_date, parse_optional_id,
};

/// Single-invoice form. Line fields repeat once per row, so the body is
/// decoded with [`crate::forms::parse_multi_value`].
#[derive(Debug, Deserialize)]
pub struct InvoiceForm {
    pub student_id: String,
    pub term: String,
    pub academic_year: String,
    pub issue_date: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub line_fee_item_id: Vec<String>,
    #[serde(default)]
    pub line_description: Vec<String>,
    #[serde(default)]
    pub line_amount: Vec<String>,
}

fn parse_term(term: String, academic_year: String) -> Result<(TermName, AcademicYear), FormError> {
    Ok((
        TermName::new(term).map_err(|_| FormError::Missing("term"))?,
        AcademicYear::new(academic_year).map_err(|_| FormError::Missing("academic year"))?,
    ))
}

fn check_due_date(issue_date: NaiveDate, due_date: Option<NaiveDate>) -> Result<(), FormError> {
    match due_date {
        Some(due) if due < issue_date => Err(FormError::InvalidDate("due date".to_string())),
        _ => Ok(()),
    }
}

impl TryFrom<InvoiceForm> for NewInvoice {
    type Error = FormError;

    fn try_from(form: InvoiceForm) -> Result<Self, Self::Error> {
        let rows = form.line_description.len().max(form.line_amount.len());
        let mut lines = Vec::with_capacity(rows);

        for index in 0..rows {
            let description = form.line_description.get(index).map_or("", String::as_str);
            let amount = form.line_amount.get(index).map_or("", String::as_str);
            if description.trim().is_empty() && amount.trim().is_empty() {
                continue;
            }
            let fee_item_id = form
                .line_fee_item_id
                .get(index)
                .map(|raw| parse_optional_id::<FeeItemId>(raw, "fee item"))
                .transpose()?
                .flatten();

            lines.push(NewInvoiceLine {
                fee_item_id,
                description: EntityName::new(description)
                    .map_err(|_| FormError::Missing("line description"))?,
                amount: Amount::parse(amount).map_err(|_| FormError::InvalidAmount)?,
            });
        }

        if lines.is_empty() {
            return Err(FormError::Missing("at least one invoice line"));
        }

        let issue_date = parse_date(&form.issue_date, "issue date")?;
        let due_date = parse_optional_date(&form.due_date, "due date")?;
        check_due_date(issue_date, due_date)?;
        let (term, academic_year) = parse_term(form.term, form.academic_year)?;

        Ok(Self {
            student_id: parse_id(&form.student_id, "student")?,
            term,
            academic_year,
            issue_date,
            due_date,
            lines,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CancelInvoiceForm {
    #[serde(default)]
    pub reason: String,
}

impl TryFrom<CancelInvoiceForm> for CancelInvoice {
    type Error = FormError;

    fn try_from(form: CancelInvoiceForm) -> Result<Self, Self::Error> {
        Ok(Self {
            reason: Remark::new(form.reason).map_err(|_| FormError::Missing("reason"))?,
        })
    }
}

/// Bulk invoicing selection: one classroom, one term and the fee items to bill.
#[derive(Debug, Deserialize)]
pub struct BulkInvoiceForm {
    pub classroom_id: String,
    pub term: String,
    pub academic_year: String,
    pub issue_date: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub fee_item_id: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BulkInvoicePayload {
    pub classroom_id: ClassroomId,
    pub term: TermName,
    pub academic_year: AcademicYear,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub fee_item_ids: Vec<FeeItemId>,
}

impl TryFrom<BulkInvoiceForm> for BulkInvoicePayload {
    type Error = FormError;

    fn try_from(form: BulkInvoiceForm) -> Result<Self, Self::Error> {
        let mut fee_item_ids = form
            .fee_item_id
            .iter()
            .filter_map(|raw| optional_text(raw))
            .map(|raw| parse_id::<FeeItemId>(&raw, "fee item"))
            .collect::<Result<Vec<_>, _>>()?;
        fee_item_ids.sort_unstable();
        fee_item_ids.dedup();
        if fee_item_ids.is_empty() {
            return Err(FormError::Missing("at least one fee item"));
        }

        let issue_date = parse_date(&form.issue_date, "issue date")?;
        let due_date = parse_optional_date(&form.due_date, "due date")?;
        check_due_date(issue_date, due_date)?;
        let (term, academic_year) = parse_term(form.term, form.academic_year)?;

        Ok(Self {
            classroom_id: parse_id(&form.classroom_id, "classroom")?,
            term,
            academic_year,
            issue_date,
            due_date,
            fee_item_ids,
        })
    }
}
