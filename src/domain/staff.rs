use serde::{Deserialize, Serialize};

use crate::domain::types::{BranchId, EmailAddress, PersonName, PhoneNumber, StaffId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Staff {
    pub id: StaffId,
    #[serde(default)]
    pub staff_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: String,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewStaff {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub phone: Option<PhoneNumber>,
    pub role: String,
    pub branch_id: Option<BranchId>,
    pub is_active: bool,
}
