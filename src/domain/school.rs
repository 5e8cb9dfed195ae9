//! Branches and classrooms of the school.

use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BranchId, ClassroomId, EmailAddress, EntityName, GradeName, PhoneNumber, StaffId,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BranchProfile {
    pub id: BranchId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewBranch {
    pub name: EntityName,
    pub code: Option<String>,
    pub address: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<EmailAddress>,
    pub is_active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    pub grade: String,
    #[serde(default)]
    pub stream: Option<String>,
    pub branch_id: BranchId,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub teacher_id: Option<StaffId>,
    #[serde(default)]
    pub student_count: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewClassroom {
    pub name: EntityName,
    pub grade: GradeName,
    pub stream: Option<String>,
    pub branch_id: BranchId,
    pub capacity: Option<u32>,
    pub teacher_id: Option<StaffId>,
}
