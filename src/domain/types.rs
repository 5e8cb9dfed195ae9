//! Strongly-typed value objects used by domain payloads.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email, positive money amounts) so that once a value
//! reaches a write payload it can be sent to the backend as-is.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use phonenumber::{Mode, country, parse};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Amount could not be parsed or was not strictly positive.
    #[error("amount must be a positive number")]
    InvalidAmount,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive backend identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i64` backing this identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(UserId, "Unique identifier for a dashboard user account.");
id_newtype!(StudentId, "Unique identifier for a student.");
id_newtype!(StaffId, "Unique identifier for a staff member.");
id_newtype!(BranchId, "Unique identifier for a school branch.");
id_newtype!(ClassroomId, "Unique identifier for a classroom.");
id_newtype!(FeeItemId, "Unique identifier for a fee catalog entry.");
id_newtype!(InvoiceId, "Unique identifier for an invoice.");
id_newtype!(PaymentId, "Unique identifier for a payment.");
id_newtype!(RefundId, "Unique identifier for a refund.");
id_newtype!(ExpenseId, "Unique identifier for an expense.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(PersonName, "First or last name enforcing non-empty values.");
non_empty_string_newtype!(EntityName, "Branch, classroom or fee item name.");
non_empty_string_newtype!(GradeName, "Grade label such as `Grade 4` or `PP2`.");
non_empty_string_newtype!(TermName, "Academic term label such as `Term 1`.");
non_empty_string_newtype!(AcademicYear, "Academic year label such as `2025`.");
non_empty_string_newtype!(Reference, "External payment or document reference.");

/// Free-text reason or description, sanitized of markup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Remark(String);

impl Remark {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?;
        Ok(Self(inner.into_inner()))
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Remark {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Remark> for String {
    fn from(value: Remark) -> Self {
        value.0
    }
}

/// Normalizes a phone number string to E.164 format.
///
/// Numbers without an international prefix are read as Kenyan numbers.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed =
        parse(Some(country::Id::KE), trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    if !phonenumber::is_valid(&parsed) {
        return Err(TypeConstraintError::InvalidPhone);
    }
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// Strictly positive money amount rounded to two decimal places.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Rounds to cents and rejects zero or negative values.
    pub fn new(value: Decimal) -> Result<Self, TypeConstraintError> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded > Decimal::ZERO {
            Ok(Self(rounded))
        } else {
            Err(TypeConstraintError::InvalidAmount)
        }
    }

    /// Parses user input such as `1,500.50` or `1500`.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let cleaned: String = value
            .trim()
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();
        let decimal = Decimal::from_str(&cleaned).map_err(|_| TypeConstraintError::InvalidAmount)?;
        Self::new(decimal)
    }

    pub const fn get(self) -> Decimal {
        self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = TypeConstraintError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reject_non_positive_values() {
        assert_eq!(StudentId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(InvoiceId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(PaymentId::new(7).map(PaymentId::get), Ok(7));
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = EmailAddress::new("  Bursar@School.CO.KE ").unwrap();
        assert_eq!(email.as_str(), "bursar@school.co.ke");
        assert!(EmailAddress::new("not-an-email").is_err());
    }

    #[test]
    fn local_phone_numbers_normalize_to_kenyan_e164() {
        let phone = PhoneNumber::new("0712 345 678").unwrap();
        assert_eq!(phone.as_str(), "+254712345678");
        assert_eq!(
            PhoneNumber::new("   "),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn amount_parses_grouped_input_and_rounds_to_cents() {
        let amount = Amount::parse("1,500.505").unwrap();
        assert_eq!(amount.get(), Decimal::new(150051, 2));
        assert_eq!(amount.to_string(), "1500.51");
    }

    #[test]
    fn amount_rejects_zero_negative_and_garbage() {
        assert_eq!(Amount::parse("0"), Err(TypeConstraintError::InvalidAmount));
        assert_eq!(Amount::parse("-10"), Err(TypeConstraintError::InvalidAmount));
        assert_eq!(Amount::parse("ten"), Err(TypeConstraintError::InvalidAmount));
        assert_eq!(Amount::parse("0.001"), Err(TypeConstraintError::InvalidAmount));
    }

    #[test]
    fn remark_strips_markup() {
        let remark = Remark::new("Duplicate <script>alert(1)</script>entry").unwrap();
        assert_eq!(remark.as_str(), "Duplicate entry");
        assert!(Remark::new("<script>x</script>").is_err());
    }

    #[test]
    fn names_are_trimmed() {
        let name = PersonName::new("  Achieng ").unwrap();
        assert_eq!(&*name, "Achieng");
        assert_eq!(GradeName::new(""), Err(TypeConstraintError::EmptyString));
    }
}
