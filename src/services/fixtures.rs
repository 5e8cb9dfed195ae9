//! Builders shared by the service tests.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::expense::{Expense, ExpenseStatus};
use crate::domain::fee_item::{FeeCategory, FeeItem, GradeOverride};
use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::domain::refund::{Refund, RefundStatus};
use crate::domain::school::Classroom;
use crate::domain::student::{Student, StudentStatus};
use crate::domain::types::{
    BranchId, ClassroomId, ExpenseId, FeeItemId, InvoiceId, PaymentId, RefundId, StudentId,
    UserId,
};
use crate::{ADMIN_ROLE, FINANCE_ROLE};

pub fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId::new(1).unwrap(),
        email: "user@school.ac.ke".to_string(),
        name: "Test User".to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        school_name: Some("Greenfield Academy".to_string()),
        branch_id: None,
        token: "token".to_string(),
    }
}

pub fn admin_user() -> AuthenticatedUser {
    user_with_roles(&[ADMIN_ROLE])
}

pub fn accountant_user() -> AuthenticatedUser {
    user_with_roles(&[FINANCE_ROLE])
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn student(id: i64, first: &str, last: &str) -> Student {
    Student {
        id: StudentId::new(id).unwrap(),
        admission_number: format!("ADM-{id:03}"),
        first_name: first.to_string(),
        last_name: last.to_string(),
        gender: None,
        date_of_birth: None,
        grade: Some("Grade 4".to_string()),
        classroom_id: Some(ClassroomId::new(2).unwrap()),
        classroom_name: Some("4 East".to_string()),
        branch_id: Some(BranchId::new(1).unwrap()),
        branch_name: Some("Main".to_string()),
        guardian_name: None,
        guardian_phone: None,
        guardian_email: None,
        photo_url: None,
        status: StudentStatus::Active,
        enrolled_on: Some(day(2024, 1, 8)),
    }
}

pub fn classroom(id: i64, grade: &str) -> Classroom {
    Classroom {
        id: ClassroomId::new(id).unwrap(),
        name: format!("{grade} East"),
        grade: grade.to_string(),
        stream: Some("East".to_string()),
        branch_id: BranchId::new(1).unwrap(),
        capacity: Some(40),
        teacher_id: None,
        student_count: 0,
    }
}

pub fn invoice(id: i64, student_id: i64, total: i64, paid: i64, status: InvoiceStatus) -> Invoice {
    Invoice {
        id: InvoiceId::new(id).unwrap(),
        invoice_number: format!("INV-{id:04}"),
        student_id: StudentId::new(student_id).unwrap(),
        student_name: format!("Student {student_id}"),
        term: Some("Term 1".to_string()),
        academic_year: Some("2025".to_string()),
        issue_date: day(2025, 1, id as u32 % 28 + 1),
        due_date: None,
        total_amount: Decimal::from(total),
        paid_amount: Decimal::from(paid),
        balance: Decimal::from(total - paid),
        status,
        lines: vec![],
        cancellation_reason: None,
        created_at: None,
    }
}

pub fn payment(id: i64, student_id: i64, amount: i64, status: PaymentStatus) -> Payment {
    Payment {
        id: PaymentId::new(id).unwrap(),
        reference: format!("PAY-{id:04}"),
        student_id: StudentId::new(student_id).unwrap(),
        student_name: format!("Student {student_id}"),
        amount: Decimal::from(amount),
        allocated_amount: Decimal::ZERO,
        unallocated_amount: Decimal::from(amount),
        available_for_refund: Decimal::from(amount),
        method: PaymentMethod::Mpesa,
        status,
        paid_at: Utc
            .with_ymd_and_hms(2025, 2, id as u32 % 28 + 1, 9, 0, 0)
            .unwrap(),
        reversed_at: None,
        reversal_reason: None,
        allocations: vec![],
    }
}

pub fn refund(id: i64, payment_id: i64, amount: i64, status: RefundStatus) -> Refund {
    Refund {
        id: RefundId::new(id).unwrap(),
        payment_id: PaymentId::new(payment_id).unwrap(),
        payment_reference: Some(format!("PAY-{payment_id:04}")),
        student_id: StudentId::new(1).unwrap(),
        student_name: "Student 1".to_string(),
        amount: Decimal::from(amount),
        reason: Some("Overpayment".to_string()),
        status,
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        processed_at: None,
    }
}

pub fn fee_item(id: i64, name: &str, amount: i64, overrides: Vec<GradeOverride>) -> FeeItem {
    FeeItem {
        id: FeeItemId::new(id).unwrap(),
        name: name.to_string(),
        category: FeeCategory::Tuition,
        default_amount: Decimal::from(amount),
        is_active: true,
        overrides,
    }
}

pub fn expense(id: i64, amount: i64, status: ExpenseStatus) -> Expense {
    Expense {
        id: ExpenseId::new(id).unwrap(),
        category: "Maintenance".to_string(),
        description: format!("Expense {id}"),
        amount: Decimal::from(amount),
        status,
        incurred_on: day(2025, 3, id as u32 % 28 + 1),
        vendor: None,
        reference: None,
        branch_id: None,
    }
}
