use serde::Deserialize;

use crate::domain::payment::{AllocatePayment, NewAllocation, NewPayment, PaymentMethod, ReversePayment};
use crate::domain::refund::{NewRefund, RejectRefund};
use crate::domain::types::{Amount, Reference, Remark};
use crate::forms::{FormError, parse_date, parse_id, parse_optional_id};

#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub student_id: String,
    pub amount: String,
    pub method: String,
    pub reference: String,
    pub paid_on: String,
    #[serde(default)]
    pub invoice_id: String,
}

impl TryFrom<PaymentForm> for NewPayment {
    type Error = FormError;

    fn try_from(form: PaymentForm) -> Result<Self, Self::Error> {
        Ok(Self {
            student_id: parse_id(&form.student_id, "student")?,
            amount: Amount::parse(&form.amount).map_err(|_| FormError::InvalidAmount)?,
            method: PaymentMethod::try_from(form.method.as_str())
                .map_err(|_| FormError::InvalidChoice("payment method"))?,
            reference: Reference::new(form.reference).map_err(|_| FormError::Missing("reference"))?,
            paid_on: parse_date(&form.paid_on, "payment date")?,
            invoice_id: parse_optional_id(&form.invoice_id, "invoice")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ReasonForm {
    #[serde(default)]
    pub reason: String,
}

impl ReasonForm {
    fn remark(self) -> Result<Remark, FormError> {
        Remark::new(self.reason).map_err(|_| FormError::Missing("reason"))
    }
}

impl TryFrom<ReasonForm> for ReversePayment {
    type Error = FormError;

    fn try_from(form: ReasonForm) -> Result<Self, Self::Error> {
        Ok(Self {
            reason: form.remark()?,
        })
    }
}

impl TryFrom<ReasonForm> for RejectRefund {
    type Error = FormError;

    fn try_from(form: ReasonForm) -> Result<Self, Self::Error> {
        Ok(Self {
            reason: form.remark()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AllocatePaymentForm {
    pub invoice_id: String,
    pub amount: String,
}

impl TryFrom<AllocatePaymentForm> for AllocatePayment {
    type Error = FormError;

    fn try_from(form: AllocatePaymentForm) -> Result<Self, Self::Error> {
        Ok(Self {
            allocations: vec![NewAllocation {
                invoice_id: parse_id(&form.invoice_id, "invoice")?,
                amount: Amount::parse(&form.amount).map_err(|_| FormError::InvalidAmount)?,
            }],
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RefundForm {
    pub payment_id: String,
    pub amount: String,
    #[serde(default)]
    pub reason: String,
}

impl TryFrom<RefundForm> for NewRefund {
    type Error = FormError;

    fn try_from(form: RefundForm) -> Result<Self, Self::Error> {
        Ok(Self {
            payment_id: parse_id(&form.payment_id, "payment")?,
            amount: Amount::parse(&form.amount).map_err(|_| FormError::InvalidAmount)?,
            reason: Remark::new(form.reason).map_err(|_| FormError::Missing("reason"))?,
        })
    }
}
