//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use crate::client::{ApiEnvelope, ApiRequest};
use crate::domain::auth::{LoginCredentials, LoginSession, UserProfile};
use crate::domain::expense::{Expense, NewExpense, RejectExpense};
use crate::domain::fee_item::{FeeItem, NewFeeItem, NewGradeOverride};
use crate::domain::invoice::{
    BulkInvoiceRequest, BulkInvoiceResult, CancelInvoice, Invoice, NewInvoice,
};
use crate::domain::payment::{AllocatePayment, NewPayment, Payment, ReversePayment};
use crate::domain::refund::{NewRefund, Refund, RejectRefund};
use crate::domain::school::{BranchProfile, Classroom, NewBranch, NewClassroom};
use crate::domain::staff::{NewStaff, Staff};
use crate::domain::student::{NewStudent, Student, StudentPhoto};
use crate::domain::types::{
    BranchId, ExpenseId, FeeItemId, InvoiceId, PaymentId, RefundId, StaffId, StudentId,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AuthGateway, BackendProxy, BranchReader, BranchWriter, ClassroomListQuery, ClassroomReader,
    ClassroomWriter, ExpenseListQuery, ExpenseReader, ExpenseWriter, FeeItemReader,
    FeeItemWriter, InvoiceListQuery, InvoiceReader, InvoiceWriter, PaymentListQuery,
    PaymentReader, PaymentWriter, RefundListQuery, RefundReader, RefundWriter, StaffListQuery,
    StaffReader, StaffWriter, StudentListQuery, StudentReader, StudentWriter,
};

mock! {
    pub Repository {}

    #[async_trait]
    impl AuthGateway for Repository {
        async fn login(&self, credentials: &LoginCredentials) -> RepositoryResult<LoginSession>;
        async fn current_user(&self) -> RepositoryResult<UserProfile>;
        async fn logout(&self) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl BackendProxy for Repository {
        async fn forward_request(
            &self,
            request: ApiRequest,
        ) -> RepositoryResult<(u16, ApiEnvelope<Value>)>;
    }

    #[async_trait]
    impl StudentReader for Repository {
        async fn list_students(&self, query: StudentListQuery) -> RepositoryResult<Vec<Student>>;
        async fn get_student(&self, id: StudentId) -> RepositoryResult<Student>;
    }

    #[async_trait]
    impl StudentWriter for Repository {
        async fn create_student(&self, student: &NewStudent) -> RepositoryResult<Student>;
        async fn update_student(
            &self,
            id: StudentId,
            student: &NewStudent,
        ) -> RepositoryResult<Student>;
        async fn upload_student_photo(
            &self,
            id: StudentId,
            photo: &StudentPhoto,
        ) -> RepositoryResult<Student>;
    }

    #[async_trait]
    impl StaffReader for Repository {
        async fn list_staff(&self, query: StaffListQuery) -> RepositoryResult<Vec<Staff>>;
        async fn get_staff(&self, id: StaffId) -> RepositoryResult<Staff>;
    }

    #[async_trait]
    impl StaffWriter for Repository {
        async fn create_staff(&self, staff: &NewStaff) -> RepositoryResult<Staff>;
        async fn update_staff(&self, id: StaffId, staff: &NewStaff) -> RepositoryResult<Staff>;
    }

    #[async_trait]
    impl BranchReader for Repository {
        async fn list_branches(&self) -> RepositoryResult<Vec<BranchProfile>>;
        async fn get_branch(&self, id: BranchId) -> RepositoryResult<BranchProfile>;
    }

    #[async_trait]
    impl BranchWriter for Repository {
        async fn create_branch(&self, branch: &NewBranch) -> RepositoryResult<BranchProfile>;
        async fn update_branch(
            &self,
            id: BranchId,
            branch: &NewBranch,
        ) -> RepositoryResult<BranchProfile>;
    }

    #[async_trait]
    impl ClassroomReader for Repository {
        async fn list_classrooms(&self, query: ClassroomListQuery) -> RepositoryResult<Vec<Classroom>>;
    }

    #[async_trait]
    impl ClassroomWriter for Repository {
        async fn create_classroom(&self, classroom: &NewClassroom) -> RepositoryResult<Classroom>;
    }

    #[async_trait]
    impl FeeItemReader for Repository {
        async fn list_fee_items(&self) -> RepositoryResult<Vec<FeeItem>>;
        async fn get_fee_item(&self, id: FeeItemId) -> RepositoryResult<FeeItem>;
    }

    #[async_trait]
    impl FeeItemWriter for Repository {
        async fn create_fee_item(&self, fee_item: &NewFeeItem) -> RepositoryResult<FeeItem>;
        async fn update_fee_item(
            &self,
            id: FeeItemId,
            fee_item: &NewFeeItem,
        ) -> RepositoryResult<FeeItem>;
        async fn add_grade_override(
            &self,
            id: FeeItemId,
            grade_override: &NewGradeOverride,
        ) -> RepositoryResult<FeeItem>;
    }

    #[async_trait]
    impl InvoiceReader for Repository {
        async fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<Vec<Invoice>>;
        async fn get_invoice(&self, id: InvoiceId) -> RepositoryResult<Invoice>;
    }

    #[async_trait]
    impl InvoiceWriter for Repository {
        async fn create_invoice(&self, invoice: &NewInvoice) -> RepositoryResult<Invoice>;
        async fn create_bulk_invoices(
            &self,
            request: &BulkInvoiceRequest,
        ) -> RepositoryResult<BulkInvoiceResult>;
        async fn cancel_invoice(
            &self,
            id: InvoiceId,
            cancel: &CancelInvoice,
        ) -> RepositoryResult<Invoice>;
    }

    #[async_trait]
    impl PaymentReader for Repository {
        async fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<Vec<Payment>>;
        async fn get_payment(&self, id: PaymentId) -> RepositoryResult<Payment>;
    }

    #[async_trait]
    impl PaymentWriter for Repository {
        async fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment>;
        async fn approve_payment(&self, id: PaymentId) -> RepositoryResult<Payment>;
        async fn reverse_payment(
            &self,
            id: PaymentId,
            reversal: &ReversePayment,
        ) -> RepositoryResult<Payment>;
        async fn allocate_payment(
            &self,
            id: PaymentId,
            allocation: &AllocatePayment,
        ) -> RepositoryResult<Payment>;
    }

    #[async_trait]
    impl RefundReader for Repository {
        async fn list_refunds(&self, query: RefundListQuery) -> RepositoryResult<Vec<Refund>>;
    }

    #[async_trait]
    impl RefundWriter for Repository {
        async fn create_refund(&self, refund: &NewRefund) -> RepositoryResult<Refund>;
        async fn approve_refund(&self, id: RefundId) -> RepositoryResult<Refund>;
        async fn reject_refund(
            &self,
            id: RefundId,
            rejection: &RejectRefund,
        ) -> RepositoryResult<Refund>;
    }

    #[async_trait]
    impl ExpenseReader for Repository {
        async fn list_expenses(&self, query: ExpenseListQuery) -> RepositoryResult<Vec<Expense>>;
    }

    #[async_trait]
    impl ExpenseWriter for Repository {
        async fn create_expense(&self, expense: &NewExpense) -> RepositoryResult<Expense>;
        async fn approve_expense(&self, id: ExpenseId) -> RepositoryResult<Expense>;
        async fn reject_expense(
            &self,
            id: ExpenseId,
            rejection: &RejectExpense,
        ) -> RepositoryResult<Expense>;
    }
}
