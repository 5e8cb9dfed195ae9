//! Form definitions backing the dashboard routes.
//!
//! Each form is deserialized from the request, validated with `validator`, and
//! converted with `TryFrom` into a write payload built from value objects.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod expenses;
pub mod fee_items;
pub mod invoices;
pub mod payments;
pub mod schools;
pub mod staff;
pub mod students;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid {0}")]
    InvalidId(&'static str),

    #[error("invalid amount")]
    InvalidAmount,

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid {0}")]
    InvalidChoice(&'static str),

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("photo must be a JPEG, PNG or WebP image")]
    UnsupportedPhoto,

    #[error("photo exceeds {0} bytes")]
    PhotoTooLarge(usize),

    #[error("failed to read upload: {0}")]
    Upload(String),

    #[error("malformed form body: {0}")]
    Malformed(String),
}

impl FormError {
    /// Text shown in the flash message.
    pub fn user_message(&self) -> String {
        match self {
            FormError::Validation(_) => "Please check the highlighted fields.".to_string(),
            FormError::InvalidEmail => "Enter a valid email address.".to_string(),
            FormError::InvalidPhoneNumber => "Enter a valid phone number.".to_string(),
            FormError::InvalidName => "Name cannot be empty.".to_string(),
            FormError::InvalidId(what) => format!("Select a valid {what}."),
            FormError::InvalidAmount => "Amount must be a positive number.".to_string(),
            FormError::InvalidDate(field) => format!("Enter a valid {field} (YYYY-MM-DD)."),
            FormError::InvalidChoice(what) => format!("Select a valid {what}."),
            FormError::Missing(what) => format!("{} is required.", capitalize(what)),
            FormError::UnsupportedPhoto => self.to_string(),
            FormError::PhotoTooLarge(limit) => {
                format!("Photo is too large (limit {} KB).", limit / 1024)
            }
            FormError::Upload(_) => "Failed to read the uploaded file.".to_string(),
            FormError::Malformed(_) => "The submitted form could not be read.".to_string(),
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Decodes a urlencoded body whose fields may repeat (`line_amount=1&line_amount=2`).
pub fn parse_multi_value<T: DeserializeOwned>(body: &[u8]) -> Result<T, FormError> {
    serde_html_form::from_bytes(body).map_err(|e| FormError::Malformed(e.to_string()))
}

/// Trimmed value, or `None` for blank input.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parses an HTML `date` input (`YYYY-MM-DD`).
pub(crate) fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate(field.to_string()))
}

pub(crate) fn parse_optional_date(
    value: &str,
    field: &'static str,
) -> Result<Option<NaiveDate>, FormError> {
    match optional_text(value) {
        Some(text) => parse_date(&text, field).map(Some),
        None => Ok(None),
    }
}

/// Parses an optional numeric select value into an identifier newtype.
pub(crate) fn parse_optional_id<T>(value: &str, what: &'static str) -> Result<Option<T>, FormError>
where
    T: TryFrom<i64, Error = TypeConstraintError>,
{
    match optional_text(value) {
        Some(text) => parse_id(&text, what).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn parse_id<T>(value: &str, what: &'static str) -> Result<T, FormError>
where
    T: TryFrom<i64, Error = TypeConstraintError>,
{
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|raw| T::try_from(raw).ok())
        .ok_or(FormError::InvalidId(what))
}

/// HTML checkboxes submit a value only when ticked.
pub(crate) fn checkbox(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| matches!(v.trim(), "on" | "true" | "1" | "yes"))
}
