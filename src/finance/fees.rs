//! Fee amount resolution with grade-level overrides.
//!
//! The backend stays authoritative for invoice totals; these helpers build the
//! bulk-invoice preview and the explicit line amounts submitted with it.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::fee_item::{FeeItem, GradeOverride};
use crate::domain::types::FeeItemId;

fn same_label(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Override matching the grade, term and academic year, if any.
pub fn find_override<'a>(
    fee_item: &'a FeeItem,
    grade: &str,
    term: &str,
    academic_year: &str,
) -> Option<&'a GradeOverride> {
    fee_item.overrides.iter().find(|o| {
        same_label(&o.grade, grade)
            && same_label(&o.term, term)
            && same_label(&o.academic_year, academic_year)
    })
}

/// Amount charged for a fee item: first matching override, else the default.
pub fn resolve_fee_amount(fee_item: &FeeItem, grade: &str, term: &str, academic_year: &str) -> Decimal {
    find_override(fee_item, grade, term, academic_year)
        .map(|o| o.amount)
        .unwrap_or(fee_item.default_amount)
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ResolvedFeeLine {
    pub fee_item_id: FeeItemId,
    pub name: String,
    pub amount: Decimal,
    pub overridden: bool,
}

/// Resolves every selected fee item for one grade/term/year combination.
pub fn resolve_fee_lines(
    fee_items: &[FeeItem],
    grade: &str,
    term: &str,
    academic_year: &str,
) -> Vec<ResolvedFeeLine> {
    fee_items
        .iter()
        .map(|item| {
            let matched = find_override(item, grade, term, academic_year);
            ResolvedFeeLine {
                fee_item_id: item.id,
                name: item.name.clone(),
                amount: matched.map(|o| o.amount).unwrap_or(item.default_amount),
                overridden: matched.is_some(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fee_item::FeeCategory;

    fn tuition() -> FeeItem {
        FeeItem {
            id: FeeItemId::new(3).unwrap(),
            name: "Tuition".to_string(),
            category: FeeCategory::Tuition,
            default_amount: Decimal::from(15000),
            is_active: true,
            overrides: vec![
                GradeOverride {
                    grade: "Grade 4".to_string(),
                    term: "Term 1".to_string(),
                    academic_year: "2025".to_string(),
                    amount: Decimal::from(18000),
                },
                GradeOverride {
                    grade: "Grade 4".to_string(),
                    term: "Term 1".to_string(),
                    academic_year: "2025".to_string(),
                    amount: Decimal::from(99999),
                },
            ],
        }
    }

    #[test]
    fn matching_override_replaces_default() {
        assert_eq!(
            resolve_fee_amount(&tuition(), " grade 4", "TERM 1", "2025"),
            Decimal::from(18000)
        );
    }

    #[test]
    fn any_mismatch_falls_back_to_default() {
        let item = tuition();
        assert_eq!(resolve_fee_amount(&item, "Grade 5", "Term 1", "2025"), Decimal::from(15000));
        assert_eq!(resolve_fee_amount(&item, "Grade 4", "Term 2", "2025"), Decimal::from(15000));
        assert_eq!(resolve_fee_amount(&item, "Grade 4", "Term 1", "2024"), Decimal::from(15000));
    }

    #[test]
    fn resolved_lines_flag_overrides() {
        let mut transport = tuition();
        transport.id = FeeItemId::new(4).unwrap();
        transport.name = "Transport".to_string();
        transport.default_amount = Decimal::from(4000);
        transport.overrides.clear();

        let lines = resolve_fee_lines(&[tuition(), transport], "Grade 4", "Term 1", "2025");

        assert_eq!(lines.len(), 2);
        assert!(lines[0].overridden);
        assert_eq!(lines[0].amount, Decimal::from(18000));
        assert!(!lines[1].overridden);
        assert_eq!(lines[1].amount, Decimal::from(4000));
    }
}
