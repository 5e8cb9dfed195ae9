use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{ApiClient, ApiEnvelope, ApiRequest};
use crate::domain::auth::{LoginCredentials, LoginSession, UserProfile};
use crate::domain::expense::{Expense, ExpenseStatus, NewExpense, RejectExpense};
use crate::domain::fee_item::{FeeItem, NewFeeItem, NewGradeOverride};
use crate::domain::invoice::{
    BulkInvoiceRequest, BulkInvoiceResult, CancelInvoice, Invoice, InvoiceStatus, NewInvoice,
};
use crate::domain::payment::{AllocatePayment, NewPayment, Payment, PaymentStatus, ReversePayment};
use crate::domain::refund::{NewRefund, Refund, RefundStatus, RejectRefund};
use crate::domain::school::{BranchProfile, Classroom, NewBranch, NewClassroom};
use crate::domain::staff::{NewStaff, Staff};
use crate::domain::student::{NewStudent, Student, StudentPhoto, StudentStatus};
use crate::domain::types::{
    BranchId, ClassroomId, ExpenseId, FeeItemId, InvoiceId, PaymentId, RefundId, StaffId,
    StudentId,
};
use crate::repository::errors::RepositoryResult;

pub mod auth;
pub mod errors;
pub mod finances;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod schools;
pub mod users;

/// Backend-backed repository bound to one request's bearer token.
#[derive(Clone, Copy)]
pub struct BackendRepository<'a> {
    client: &'a ApiClient,
    token: Option<&'a str>,
}

impl<'a> BackendRepository<'a> {
    /// Repository issuing authenticated calls with the session token.
    pub fn new(client: &'a ApiClient, token: &'a str) -> Self {
        Self {
            client,
            token: Some(token),
        }
    }

    /// Repository for calls made before a session exists (login).
    pub fn anonymous(client: &'a ApiClient) -> Self {
        Self {
            client,
            token: None,
        }
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> RepositoryResult<T> {
        Ok(self.client.send(self.token, request).await?)
    }

    /// Decodes list endpoints answering either a bare array or a page object.
    pub(crate) async fn send_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> RepositoryResult<Vec<T>> {
        let payload: Option<ListPayload<T>> = self.send(request).await?;
        Ok(payload.map(ListPayload::into_items).unwrap_or_default())
    }

    pub(crate) fn client(&self) -> &'a ApiClient {
        self.client
    }

    pub(crate) fn token(&self) -> Option<&'a str> {
        self.token
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    Items(Vec<T>),
    Page {
        #[serde(alias = "results")]
        items: Vec<T>,
    },
}

impl<T> ListPayload<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Items(items) | ListPayload::Page { items } => items,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentListQuery {
    pub search: Option<String>,
    pub status: Option<StudentStatus>,
    pub classroom_id: Option<ClassroomId>,
    pub branch_id: Option<BranchId>,
    pub grade: Option<String>,
}

impl StudentListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn status(mut self, status: StudentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn classroom(mut self, classroom_id: ClassroomId) -> Self {
        self.classroom_id = Some(classroom_id);
        self
    }

    pub fn branch(mut self, branch_id: BranchId) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    pub fn grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffListQuery {
    pub search: Option<String>,
    pub branch_id: Option<BranchId>,
    pub role: Option<String>,
}

impl StaffListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn branch(mut self, branch_id: BranchId) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassroomListQuery {
    pub branch_id: Option<BranchId>,
    pub grade: Option<String>,
}

impl ClassroomListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branch(mut self, branch_id: BranchId) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    pub fn grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceListQuery {
    pub student_id: Option<StudentId>,
    pub status: Option<InvoiceStatus>,
    pub term: Option<String>,
    pub academic_year: Option<String>,
}

impl InvoiceListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, student_id: StudentId) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn term(mut self, term: impl Into<String>, academic_year: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self.academic_year = Some(academic_year.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentListQuery {
    pub student_id: Option<StudentId>,
    pub status: Option<PaymentStatus>,
}

impl PaymentListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, student_id: StudentId) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefundListQuery {
    pub student_id: Option<StudentId>,
    pub payment_id: Option<PaymentId>,
    pub status: Option<RefundStatus>,
}

impl RefundListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, student_id: StudentId) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn payment(mut self, payment_id: PaymentId) -> Self {
        self.payment_id = Some(payment_id);
        self
    }

    pub fn status(mut self, status: RefundStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseListQuery {
    pub status: Option<ExpenseStatus>,
    pub branch_id: Option<BranchId>,
}

impl ExpenseListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: ExpenseStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn branch(mut self, branch_id: BranchId) -> Self {
        self.branch_id = Some(branch_id);
        self
    }
}

#[async_trait]
pub trait AuthGateway {
    async fn login(&self, credentials: &LoginCredentials) -> RepositoryResult<LoginSession>;
    async fn current_user(&self) -> RepositoryResult<UserProfile>;
    async fn logout(&self) -> RepositoryResult<()>;
}

#[async_trait]
pub trait BackendProxy {
    /// Forwards an arbitrary relative request and returns the HTTP status with
    /// the raw envelope.
    async fn forward_request(
        &self,
        request: ApiRequest,
    ) -> RepositoryResult<(u16, ApiEnvelope<Value>)>;
}

#[async_trait]
pub trait StudentReader {
    async fn list_students(&self, query: StudentListQuery) -> RepositoryResult<Vec<Student>>;
    async fn get_student(&self, id: StudentId) -> RepositoryResult<Student>;
}

#[async_trait]
pub trait StudentWriter {
    async fn create_student(&self, student: &NewStudent) -> RepositoryResult<Student>;
    async fn update_student(&self, id: StudentId, student: &NewStudent)
    -> RepositoryResult<Student>;
    async fn upload_student_photo(
        &self,
        id: StudentId,
        photo: &StudentPhoto,
    ) -> RepositoryResult<Student>;
}

#[async_trait]
pub trait StaffReader {
    async fn list_staff(&self, query: StaffListQuery) -> RepositoryResult<Vec<Staff>>;
    async fn get_staff(&self, id: StaffId) -> RepositoryResult<Staff>;
}

#[async_trait]
pub trait StaffWriter {
    async fn create_staff(&self, staff: &NewStaff) -> RepositoryResult<Staff>;
    async fn update_staff(&self, id: StaffId, staff: &NewStaff) -> RepositoryResult<Staff>;
}

#[async_trait]
pub trait BranchReader {
    async fn list_branches(&self) -> RepositoryResult<Vec<BranchProfile>>;
    async fn get_branch(&self, id: BranchId) -> RepositoryResult<BranchProfile>;
}

#[async_trait]
pub trait BranchWriter {
    async fn create_branch(&self, branch: &NewBranch) -> RepositoryResult<BranchProfile>;
    async fn update_branch(
        &self,
        id: BranchId,
        branch: &NewBranch,
    ) -> RepositoryResult<BranchProfile>;
}

#[async_trait]
pub trait ClassroomReader {
    async fn list_classrooms(&self, query: ClassroomListQuery) -> RepositoryResult<Vec<Classroom>>;
}

#[async_trait]
pub trait ClassroomWriter {
    async fn create_classroom(&self, classroom: &NewClassroom) -> RepositoryResult<Classroom>;
}

#[async_trait]
pub trait FeeItemReader {
    async fn list_fee_items(&self) -> RepositoryResult<Vec<FeeItem>>;
    async fn get_fee_item(&self, id: FeeItemId) -> RepositoryResult<FeeItem>;
}

#[async_trait]
pub trait FeeItemWriter {
    async fn create_fee_item(&self, fee_item: &NewFeeItem) -> RepositoryResult<FeeItem>;
    async fn update_fee_item(&self, id: FeeItemId, fee_item: &NewFeeItem)
    -> RepositoryResult<FeeItem>;
    async fn add_grade_override(
        &self,
        id: FeeItemId,
        grade_override: &NewGradeOverride,
    ) -> RepositoryResult<FeeItem>;
}

#[async_trait]
pub trait InvoiceReader {
    async fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<Vec<Invoice>>;
    async fn get_invoice(&self, id: InvoiceId) -> RepositoryResult<Invoice>;
}

#[async_trait]
pub trait InvoiceWriter {
    async fn create_invoice(&self, invoice: &NewInvoice) -> RepositoryResult<Invoice>;
    async fn create_bulk_invoices(
        &self,
        request: &BulkInvoiceRequest,
    ) -> RepositoryResult<BulkInvoiceResult>;
    async fn cancel_invoice(&self, id: InvoiceId, cancel: &CancelInvoice)
    -> RepositoryResult<Invoice>;
}

#[async_trait]
pub trait PaymentReader {
    async fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<Vec<Payment>>;
    async fn get_payment(&self, id: PaymentId) -> RepositoryResult<Payment>;
}

#[async_trait]
pub trait PaymentWriter {
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
pub trait RefundReader {
    async fn list_refunds(&self, query: RefundListQuery) -> RepositoryResult<Vec<Refund>>;
}

#[async_trait]
pub trait RefundWriter {
    async fn create_refund(&self, refund: &NewRefund) -> RepositoryResult<Refund>;
    async fn approve_refund(&self, id: RefundId) -> RepositoryResult<Refund>;
    async fn reject_refund(&self, id: RefundId, rejection: &RejectRefund)
    -> RepositoryResult<Refund>;
}

#[async_trait]
pub trait ExpenseReader {
    async fn list_expenses(&self, query: ExpenseListQuery) -> RepositoryResult<Vec<Expense>>;
}

#[async_trait]
pub trait ExpenseWriter {
    async fn create_expense(&self, expense: &NewExpense) -> RepositoryResult<Expense>;
    async fn approve_expense(&self, id: ExpenseId) -> RepositoryResult<Expense>;
    async fn reject_expense(
        &self,
        id: ExpenseId,
        rejection: &RejectExpense,
    ) -> RepositoryResult<Expense>;
}
