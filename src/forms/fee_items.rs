use serde::Deserialize;
use validator::Validate;

use crate::domain::fee_item::{FeeCategory, NewFeeItem, NewGradeOverride};
use crate::domain::types::{AcademicYear, Amount, EntityName, GradeName, TermName};
use crate::forms::{FormError, checkbox};

#[derive(Debug, Deserialize, Validate)]
pub struct FeeItemForm {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub category: String,
    pub default_amount: String,
    pub is_active: Option<String>,
}

impl TryFrom<FeeItemForm> for NewFeeItem {
    type Error = FormError;

    fn try_from(form: FeeItemForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: EntityName::new(form.name).map_err(|_| FormError::InvalidName)?,
            category: FeeCategory::from_form(&form.category),
            default_amount: Amount::parse(&form.default_amount)
                .map_err(|_| FormError::InvalidAmount)?,
            is_active: checkbox(&form.is_active),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GradeOverrideForm {
    pub grade: String,
    pub term: String,
    pub academic_year: String,
    pub amount: String,
}

impl TryFrom<GradeOverrideForm> for NewGradeOverride {
    type Error = FormError;

    fn try_from(form: GradeOverrideForm) -> Result<Self, Self::Error> {
        Ok(Self {
            grade: GradeName::new(form.grade).map_err(|_| FormError::Missing("grade"))?,
            term: TermName::new(form.term).map_err(|_| FormError::Missing("term"))?,
            academic_year: AcademicYear::new(form.academic_year)
                .map_err(|_| FormError::Missing("academic year"))?,
            amount: Amount::parse(&form.amount).map_err(|_| FormError::InvalidAmount)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn fee_item_amount_accepts_thousands_separators() {
        let item = NewFeeItem::try_from(FeeItemForm {
            name: "Transport".to_string(),
            category: "transport".to_string(),
            default_amount: "4,500".to_string(),
            is_active: Some("on".to_string()),
        })
        .unwrap();

        assert_eq!(item.category, FeeCategory::Transport);
        assert_eq!(item.default_amount.get(), Decimal::from(4500));
    }

    #[test]
    fn override_requires_every_label() {
        let result = NewGradeOverride::try_from(GradeOverrideForm {
            grade: "Grade 4".to_string(),
            term: " ".to_string(),
            academic_year: "2025".to_string(),
            amount: "18000".to_string(),
        });
        assert!(matches!(result, Err(FormError::Missing("term"))));
    }

    #[test]
    fn zero_amount_is_rejected() {
        let result = NewGradeOverride::try_from(GradeOverrideForm {
            grade: "Grade 4".to_string(),
            term: "Term 1".to_string(),
            academic_year: "2025".to_string(),
            amount: "0".to_string(),
        });
        assert!(matches!(result, Err(FormError::InvalidAmount)));
    }
}
