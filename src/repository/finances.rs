use async_trait::async_trait;

use crate::client::ApiRequest;
use crate::domain::expense::{Expense, NewExpense, RejectExpense};
use crate::domain::fee_item::{FeeItem, NewFeeItem, NewGradeOverride};
use crate::domain::invoice::{
    BulkInvoiceRequest, BulkInvoiceResult, CancelInvoice, Invoice, NewInvoice,
};
use crate::domain::payment::{AllocatePayment, NewPayment, Payment, ReversePayment};
use crate::domain::refund::{NewRefund, Refund, RejectRefund};
use crate::domain::types::{ExpenseId, FeeItemId, InvoiceId, PaymentId, RefundId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    BackendRepository, ExpenseListQuery, ExpenseReader, ExpenseWriter, FeeItemReader,
    FeeItemWriter, InvoiceListQuery, InvoiceReader, InvoiceWriter, PaymentListQuery,
    PaymentReader, PaymentWriter, RefundListQuery, RefundReader, RefundWriter,
};

impl InvoiceListQuery {
    fn to_request(&self) -> ApiRequest {
        ApiRequest::get("/finance/invoices")
            .query_opt("student_id", self.student_id)
            .query_opt("status", self.status.map(|s| s.as_str()))
            .query_opt("term", self.term.as_deref())
            .query_opt("academic_year", self.academic_year.as_deref())
    }
}

impl PaymentListQuery {
    fn to_request(&self) -> ApiRequest {
        ApiRequest::get("/finance/payments")
            .query_opt("student_id", self.student_id)
            .query_opt("status", self.status.map(|s| s.as_str()))
    }
}

impl RefundListQuery {
    fn to_request(&self) -> ApiRequest {
        ApiRequest::get("/finance/refunds")
            .query_opt("student_id", self.student_id)
            .query_opt("payment_id", self.payment_id)
            .query_opt("status", self.status.map(|s| s.as_str()))
    }
}

impl ExpenseListQuery {
    fn to_request(&self) -> ApiRequest {
        ApiRequest::get("/finance/expenses")
            .query_opt("status", self.status.map(|s| s.as_str()))
            .query_opt("branch_id", self.branch_id)
    }
}

#[async_trait]
impl FeeItemReader for BackendRepository<'_> {
    async fn list_fee_items(&self) -> RepositoryResult<Vec<FeeItem>> {
        self.send_list(ApiRequest::get("/finance/fee-items")).await
    }

    async fn get_fee_item(&self, id: FeeItemId) -> RepositoryResult<FeeItem> {
        self.send(ApiRequest::get(format!("/finance/fee-items/{id}")))
            .await
    }
}

#[async_trait]
impl FeeItemWriter for BackendRepository<'_> {
    async fn create_fee_item(&self, fee_item: &NewFeeItem) -> RepositoryResult<FeeItem> {
        self.send(ApiRequest::post("/finance/fee-items").json(fee_item)?)
            .await
    }

    async fn update_fee_item(
        &self,
        id: FeeItemId,
        fee_item: &NewFeeItem,
    ) -> RepositoryResult<FeeItem> {
        self.send(ApiRequest::put(format!("/finance/fee-items/{id}")).json(fee_item)?)
            .await
    }

    async fn add_grade_override(
        &self,
        id: FeeItemId,
        grade_override: &NewGradeOverride,
    ) -> RepositoryResult<FeeItem> {
        self.send(
            ApiRequest::post(format!("/finance/fee-items/{id}/overrides")).json(grade_override)?,
        )
        .await
    }
}

#[async_trait]
impl InvoiceReader for BackendRepository<'_> {
    async fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<Vec<Invoice>> {
        self.send_list(query.to_request()).await
    }

    async fn get_invoice(&self, id: InvoiceId) -> RepositoryResult<Invoice> {
        self.send(ApiRequest::get(format!("/finance/invoices/{id}")))
            .await
    }
}

#[async_trait]
impl InvoiceWriter for BackendRepository<'_> {
    async fn create_invoice(&self, invoice: &NewInvoice) -> RepositoryResult<Invoice> {
        self.send(ApiRequest::post("/finance/invoices").json(invoice)?)
            .await
    }

    async fn create_bulk_invoices(
        &self,
        request: &BulkInvoiceRequest,
    ) -> RepositoryResult<BulkInvoiceResult> {
        self.send(ApiRequest::post("/finance/invoices/bulk").json(request)?)
            .await
    }

    async fn cancel_invoice(
        &self,
        id: InvoiceId,
        cancel: &CancelInvoice,
    ) -> RepositoryResult<Invoice> {
        self.send(ApiRequest::post(format!("/finance/invoices/{id}/cancel")).json(cancel)?)
            .await
    }
}

#[async_trait]
impl PaymentReader for BackendRepository<'_> {
    async fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<Vec<Payment>> {
        self.send_list(query.to_request()).await
    }

    async fn get_payment(&self, id: PaymentId) -> RepositoryResult<Payment> {
        self.send(ApiRequest::get(format!("/finance/payments/{id}")))
            .await
    }
}

#[async_trait]
impl PaymentWriter for BackendRepository<'_> {
    async fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment> {
        self.send(ApiRequest::post("/finance/payments").json(payment)?)
            .await
    }

    async fn approve_payment(&self, id: PaymentId) -> RepositoryResult<Payment> {
        self.send(ApiRequest::post(format!("/finance/payments/{id}/approve")))
            .await
    }

    async fn reverse_payment(
        &self,
        id: PaymentId,
        reversal: &ReversePayment,
    ) -> RepositoryResult<Payment> {
        self.send(ApiRequest::post(format!("/finance/payments/{id}/reverse")).json(reversal)?)
            .await
    }

    async fn allocate_payment(
        &self,
        id: PaymentId,
        allocation: &AllocatePayment,
    ) -> RepositoryResult<Payment> {
        self.send(ApiRequest::post(format!("/finance/payments/{id}/allocate")).json(allocation)?)
            .await
    }
}

#[async_trait]
impl RefundReader for BackendRepository<'_> {
    async fn list_refunds(&self, query: RefundListQuery) -> RepositoryResult<Vec<Refund>> {
        self.send_list(query.to_request()).await
    }
}

#[async_trait]
impl RefundWriter for BackendRepository<'_> {
    async fn create_refund(&self, refund: &NewRefund) -> RepositoryResult<Refund> {
        self.send(ApiRequest::post("/finance/refunds").json(refund)?)
            .await
    }

    async fn approve_refund(&self, id: RefundId) -> RepositoryResult<Refund> {
        self.send(ApiRequest::post(format!("/finance/refunds/{id}/approve")))
            .await
    }

    async fn reject_refund(
        &self,
        id: RefundId,
        rejection: &RejectRefund,
    ) -> RepositoryResult<Refund> {
        self.send(ApiRequest::post(format!("/finance/refunds/{id}/reject")).json(rejection)?)
            .await
    }
}

#[async_trait]
impl ExpenseReader for BackendRepository<'_> {
    async fn list_expenses(&self, query: ExpenseListQuery) -> RepositoryResult<Vec<Expense>> {
        self.send_list(query.to_request()).await
    }
}

#[async_trait]
impl ExpenseWriter for BackendRepository<'_> {
    async fn create_expense(&self, expense: &NewExpense) -> RepositoryResult<Expense> {
        self.send(ApiRequest::post("/finance/expenses").json(expense)?)
            .await
    }

    async fn approve_expense(&self, id: ExpenseId) -> RepositoryResult<Expense> {
        self.send(ApiRequest::post(format!("/finance/expenses/{id}/approve")))
            .await
    }

    async fn reject_expense(
        &self,
        id: ExpenseId,
        rejection: &RejectExpense,
    ) -> RepositoryResult<Expense> {
        self.send(ApiRequest::post(format!("/finance/expenses/{id}/reject")).json(rejection)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::InvoiceStatus;
    use crate::domain::types::StudentId;

    #[test]
    fn invoice_query_translates_status_and_term() {
        let request = InvoiceListQuery::new()
            .student(StudentId::new(12).unwrap())
            .status(InvoiceStatus::PartiallyPaid)
            .term("Term 2", "2025")
            .to_request();

        assert_eq!(request.path, "/finance/invoices");
        assert_eq!(
            request.query,
            vec![
                ("student_id".to_string(), "12".to_string()),
                ("status".to_string(), "PARTIALLY_PAID".to_string()),
                ("term".to_string(), "Term 2".to_string()),
                ("academic_year".to_string(), "2025".to_string()),
            ]
        );
    }

    #[test]
    fn empty_expense_query_has_no_parameters() {
        assert!(ExpenseListQuery::new().to_request().query.is_empty());
    }
}
