use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AcademicYear, Amount, EntityName, FeeItemId, GradeName, TermName};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeCategory {
    Tuition,
    Transport,
    Boarding,
    Meals,
    Activity,
    Uniform,
    Examination,
    #[serde(other)]
    Other,
}

impl FeeCategory {
    pub const ALL: [FeeCategory; 8] = [
        FeeCategory::Tuition,
        FeeCategory::Transport,
        FeeCategory::Boarding,
        FeeCategory::Meals,
        FeeCategory::Activity,
        FeeCategory::Uniform,
        FeeCategory::Examination,
        FeeCategory::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FeeCategory::Tuition => "TUITION",
            FeeCategory::Transport => "TRANSPORT",
            FeeCategory::Boarding => "BOARDING",
            FeeCategory::Meals => "MEALS",
            FeeCategory::Activity => "ACTIVITY",
            FeeCategory::Uniform => "UNIFORM",
            FeeCategory::Examination => "EXAMINATION",
            FeeCategory::Other => "OTHER",
        }
    }

    /// Parses a form value, falling back to [`FeeCategory::Other`].
    pub fn from_form(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(FeeCategory::Other)
    }
}

/// Fee amount replacing the default for one grade, term and academic year.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GradeOverride {
    pub grade: String,
    pub term: String,
    pub academic_year: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FeeItem {
    pub id: FeeItemId,
    pub name: String,
    pub category: FeeCategory,
    pub default_amount: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub overrides: Vec<GradeOverride>,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewFeeItem {
    pub name: EntityName,
    pub category: FeeCategory,
    pub default_amount: Amount,
    pub is_active: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewGradeOverride {
    pub grade: GradeName,
    pub term: TermName,
    pub academic_year: AcademicYear,
    pub amount: Amount,
}
