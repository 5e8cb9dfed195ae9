use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BranchId, ClassroomId, EmailAddress, GradeName, PersonName, PhoneNumber, StudentId,
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
    Transferred,
    #[serde(other)]
    Unknown,
}

impl StudentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            StudentStatus::Active => "ACTIVE",
            StudentStatus::Inactive => "INACTIVE",
            StudentStatus::Graduated => "GRADUATED",
            StudentStatus::Transferred => "TRANSFERRED",
            StudentStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: StudentId,
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub classroom_id: Option<ClassroomId>,
    #[serde(default)]
    pub classroom_name: Option<String>,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<String>,
    #[serde(default)]
    pub guardian_email: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub status: StudentStatus,
    #[serde(default)]
    pub enrolled_on: Option<NaiveDate>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Payload used both for enrolment and for profile updates.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewStudent {
    pub admission_number: Option<String>,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub grade: GradeName,
    pub classroom_id: Option<ClassroomId>,
    pub branch_id: BranchId,
    pub guardian_name: Option<PersonName>,
    pub guardian_phone: Option<PhoneNumber>,
    pub guardian_email: Option<EmailAddress>,
    pub status: StudentStatus,
}

/// Photo upload payload carrying an inline `data:` URL.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StudentPhoto {
    pub photo: String,
}
