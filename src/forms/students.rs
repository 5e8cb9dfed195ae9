use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use validator::Validate;

use crate::domain::student::{NewStudent, StudentPhoto, StudentStatus};
use crate::domain::types::{EmailAddress, GradeName, PersonName, PhoneNumber};
use crate::forms::{FormError, optional_text, parse_id, parse_optional_date, parse_optional_id};

#[derive(Debug, Deserialize, Validate)]
/// Create/update form for a student profile.
pub struct StudentForm {
    #[serde(default)]
    pub admission_number: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[validate(length(min = 1))]
    pub grade: String,
    #[serde(default)]
    pub classroom_id: String,
    #[serde(default)]
    pub branch_id: String,
    #[serde(default)]
    pub guardian_name: String,
    #[serde(default)]
    pub guardian_phone: String,
    #[serde(default)]
    pub guardian_email: String,
    #[serde(default)]
    pub status: String,
}

fn parse_student_status(value: &str) -> Result<StudentStatus, FormError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "" | "ACTIVE" => Ok(StudentStatus::Active),
        "INACTIVE" => Ok(StudentStatus::Inactive),
        "GRADUATED" => Ok(StudentStatus::Graduated),
        "TRANSFERRED" => Ok(StudentStatus::Transferred),
        _ => Err(FormError::InvalidChoice("status")),
    }
}

impl TryFrom<StudentForm> for NewStudent {
    type Error = FormError;

    fn try_from(form: StudentForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let guardian_name = optional_text(&form.guardian_name)
            .map(PersonName::new)
            .transpose()
            .map_err(|_| FormError::InvalidName)?;
        let guardian_phone = optional_text(&form.guardian_phone)
            .map(PhoneNumber::new)
            .transpose()
            .map_err(|_| FormError::InvalidPhoneNumber)?;
        let guardian_email = optional_text(&form.guardian_email)
            .map(EmailAddress::new)
            .transpose()
            .map_err(|_| FormError::InvalidEmail)?;

        Ok(Self {
            admission_number: optional_text(&form.admission_number),
            first_name: PersonName::new(form.first_name).map_err(|_| FormError::InvalidName)?,
            last_name: PersonName::new(form.last_name).map_err(|_| FormError::InvalidName)?,
            gender: optional_text(&form.gender),
            date_of_birth: parse_optional_date(&form.date_of_birth, "date of birth")?,
            grade: GradeName::new(form.grade).map_err(|_| FormError::Missing("grade"))?,
            classroom_id: parse_optional_id(&form.classroom_id, "classroom")?,
            branch_id: parse_id(&form.branch_id, "branch")?,
            guardian_name,
            guardian_phone,
            guardian_email,
            status: parse_student_status(&form.status)?,
        })
    }
}

#[derive(MultipartForm)]
/// Multipart upload carrying a student photo.
pub struct StudentPhotoForm {
    #[multipart(limit = "10MB")]
    pub photo: TempFile,
}

impl StudentPhotoForm {
    /// Reads the uploaded file and encodes it as a `data:` URL.
    pub fn into_photo(self, max_bytes: usize) -> Result<StudentPhoto, FormError> {
        if self.photo.size > max_bytes {
            return Err(FormError::PhotoTooLarge(max_bytes));
        }
        let bytes = std::fs::read(self.photo.file.path())
            .map_err(|e| FormError::Upload(e.to_string()))?;
        Ok(StudentPhoto {
            photo: photo_data_url(&bytes, max_bytes)?,
        })
    }
}

/// Detects the image type from its magic bytes.
fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Encodes image bytes as `data:<mime>;base64,<payload>`.
pub fn photo_data_url(bytes: &[u8], max_bytes: usize) -> Result<String, FormError> {
    if bytes.len() > max_bytes {
        return Err(FormError::PhotoTooLarge(max_bytes));
    }
    let mime = sniff_image_mime(bytes).ok_or(FormError::UnsupportedPhoto)?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> StudentForm {
        StudentForm {
            admission_number: " ".to_string(),
            first_name: "Achieng".to_string(),
            last_name: "Odhiambo".to_string(),
            gender: "F".to_string(),
            date_of_birth: "2016-04-09".to_string(),
            grade: "Grade 4".to_string(),
            classroom_id: String::new(),
            branch_id: "2".to_string(),
            guardian_name: "Mary Odhiambo".to_string(),
            guardian_phone: "0712 345 678".to_string(),
            guardian_email: String::new(),
            status: String::new(),
        }
    }

    #[test]
    fn converts_into_payload_with_normalized_phone() {
        let student = NewStudent::try_from(form()).unwrap();

        assert_eq!(student.admission_number, None);
        assert_eq!(student.classroom_id, None);
        assert_eq!(student.branch_id.get(), 2);
        assert_eq!(student.status, StudentStatus::Active);
        assert_eq!(
            student.guardian_phone.as_ref().map(|p| p.as_str()),
            Some("+254712345678")
        );
    }

    #[test]
    fn rejects_bad_guardian_contact() {
        let mut bad_phone = form();
        bad_phone.guardian_phone = "12".to_string();
        assert!(matches!(
            NewStudent::try_from(bad_phone),
            Err(FormError::InvalidPhoneNumber)
        ));

        let mut bad_email = form();
        bad_email.guardian_email = "not-an-email".to_string();
        assert!(matches!(
            NewStudent::try_from(bad_email),
            Err(FormError::InvalidEmail)
        ));
    }

    #[test]
    fn requires_names_and_branch() {
        let mut nameless = form();
        nameless.first_name = String::new();
        assert!(matches!(
            NewStudent::try_from(nameless),
            Err(FormError::Validation(_))
        ));

        let mut no_branch = form();
        no_branch.branch_id = String::new();
        assert!(matches!(
            NewStudent::try_from(no_branch),
            Err(FormError::InvalidId("branch"))
        ));
    }

    #[test]
    fn photo_is_encoded_as_data_url() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        let url = photo_data_url(&png, 1024).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn photo_type_and_size_are_checked() {
        assert!(matches!(
            photo_data_url(b"GIF89a......", 1024),
            Err(FormError::UnsupportedPhoto)
        ));
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4];
        assert!(matches!(
            photo_data_url(&jpeg, 4),
            Err(FormError::PhotoTooLarge(4))
        ));
    }
}
