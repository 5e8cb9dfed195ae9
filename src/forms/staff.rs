use serde::Deserialize;
use validator::Validate;

use crate::domain::staff::NewStaff;
use crate::domain::types::{EmailAddress, PersonName, PhoneNumber};
use crate::forms::{FormError, checkbox, optional_text, parse_optional_id};

/// Roles a staff member can be given from the dashboard.
pub const STAFF_ROLES: [&str; 5] = ["TEACHER", "ADMIN", "ACCOUNTANT", "SUPPORT", "DRIVER"];

#[derive(Debug, Deserialize, Validate)]
pub struct StaffForm {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: String,
    #[serde(default)]
    pub branch_id: String,
    pub is_active: Option<String>,
}

impl TryFrom<StaffForm> for NewStaff {
    type Error = FormError;

    fn try_from(form: StaffForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let role = form.role.trim().to_ascii_uppercase();
        if !STAFF_ROLES.contains(&role.as_str()) {
            return Err(FormError::InvalidChoice("role"));
        }

        Ok(Self {
            first_name: PersonName::new(form.first_name).map_err(|_| FormError::InvalidName)?,
            last_name: PersonName::new(form.last_name).map_err(|_| FormError::InvalidName)?,
            email: EmailAddress::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            phone: optional_text(&form.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|_| FormError::InvalidPhoneNumber)?,
            role,
            branch_id: parse_optional_id(&form.branch_id, "branch")?,
            is_active: checkbox(&form.is_active),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(role: &str) -> StaffForm {
        StaffForm {
            first_name: "Peter".to_string(),
            last_name: "Kamau".to_string(),
            email: "P.Kamau@School.ac.ke".to_string(),
            phone: String::new(),
            role: role.to_string(),
            branch_id: "1".to_string(),
            is_active: Some("on".to_string()),
        }
    }

    #[test]
    fn normalizes_role_and_email() {
        let staff = NewStaff::try_from(form("teacher")).unwrap();
        assert_eq!(staff.role, "TEACHER");
        assert_eq!(staff.email.as_str(), "p.kamau@school.ac.ke");
        assert!(staff.is_active);
        assert_eq!(staff.phone, None);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(matches!(
            NewStaff::try_from(form("janitor-in-chief")),
            Err(FormError::InvalidChoice("role"))
        ));
    }
}
