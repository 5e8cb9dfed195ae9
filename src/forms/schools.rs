use serde::Deserialize;
use validator::Validate;

use crate::domain::school::{NewBranch, NewClassroom};
use crate::domain::types::{EmailAddress, EntityName, GradeName, PhoneNumber};
use crate::forms::{FormError, checkbox, optional_text, parse_id, parse_optional_id};

#[derive(Debug, Deserialize, Validate)]
pub struct BranchForm {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub is_active: Option<String>,
}

impl TryFrom<BranchForm> for NewBranch {
    type Error = FormError;

    fn try_from(form: BranchForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: EntityName::new(form.name).map_err(|_| FormError::InvalidName)?,
            code: optional_text(&form.code).map(|c| c.to_ascii_uppercase()),
            address: optional_text(&form.address),
            phone: optional_text(&form.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|_| FormError::InvalidPhoneNumber)?,
            email: optional_text(&form.email)
                .map(EmailAddress::new)
                .transpose()
                .map_err(|_| FormError::InvalidEmail)?,
            is_active: checkbox(&form.is_active),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClassroomForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1))]
    pub grade: String,
    #[serde(default)]
    pub stream: String,
    pub branch_id: String,
    #[serde(default)]
    pub capacity: String,
    #[serde(default)]
    pub teacher_id: String,
}

impl TryFrom<ClassroomForm> for NewClassroom {
    type Error = FormError;

    fn try_from(form: ClassroomForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let capacity = match optional_text(&form.capacity) {
            Some(text) => Some(
                text.parse::<u32>()
                    .ok()
                    .filter(|c| *c > 0)
                    .ok_or(FormError::InvalidChoice("capacity"))?,
            ),
            None => None,
        };

        Ok(Self {
            name: EntityName::new(form.name).map_err(|_| FormError::InvalidName)?,
            grade: GradeName::new(form.grade).map_err(|_| FormError::Missing("grade"))?,
            stream: optional_text(&form.stream),
            branch_id: parse_id(&form.branch_id, "branch")?,
            capacity,
            teacher_id: parse_optional_id(&form.teacher_id, "teacher")?,
        })
    }
}
