//! Conjunctive list filters applied to fetched rows.
//!
//! An item is kept only when it satisfies every active predicate. Inactive
//! predicates (empty search, no status, open range bounds) always pass.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::expense::Expense;
use crate::domain::invoice::Invoice;
use crate::domain::payment::Payment;
use crate::domain::refund::Refund;
use crate::domain::staff::Staff;
use crate::domain::student::Student;

/// Row that can be narrowed down by a [`ListFilter`].
pub trait Filterable {
    /// Text fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;

    /// Status key compared against the status filter.
    fn status_key(&self) -> Option<&str> {
        None
    }

    /// Date used for date-range filtering.
    fn filter_date(&self) -> Option<NaiveDate> {
        None
    }

    /// Amount used for amount-range filtering.
    fn filter_amount(&self) -> Option<Decimal> {
        None
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn amount_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    fn active_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn active_status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
    }

    pub fn is_empty(&self) -> bool {
        self.active_search().is_none()
            && self.active_status().is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
    }

    /// Whether the item satisfies every active predicate.
    pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        if let Some(needle) = self.active_search() {
            let found = item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }

        if let Some(status) = self.active_status() {
            match item.status_key() {
                Some(key) if key.eq_ignore_ascii_case(status) => {}
                _ => return false,
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = item.filter_date() else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from)
                || self.date_to.is_some_and(|to| date > to)
            {
                return false;
            }
        }

        if self.min_amount.is_some() || self.max_amount.is_some() {
            let Some(amount) = item.filter_amount() else {
                return false;
            };
            if self.min_amount.is_some_and(|min| amount < min)
                || self.max_amount.is_some_and(|max| amount > max)
            {
                return false;
            }
        }

        true
    }

    /// Keeps the matching items, preserving order.
    pub fn apply<T: Filterable>(&self, items: Vec<T>) -> Vec<T> {
        if self.is_empty() {
            return items;
        }
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

impl Filterable for Invoice {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.invoice_number.as_str(), self.student_name.as_str()]
    }

    fn status_key(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        Some(self.issue_date)
    }

    fn filter_amount(&self) -> Option<Decimal> {
        Some(self.total_amount)
    }
}

impl Filterable for Payment {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.reference.as_str(),
            self.student_name.as_str(),
            self.method.as_str(),
        ]
    }

    fn status_key(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        Some(self.paid_at.date_naive())
    }

    fn filter_amount(&self) -> Option<Decimal> {
        Some(self.amount)
    }
}

impl Filterable for Refund {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.student_name.as_str()];
        fields.extend(self.payment_reference.as_deref());
        fields.extend(self.reason.as_deref());
        fields
    }

    fn status_key(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        Some(self.created_at.date_naive())
    }

    fn filter_amount(&self) -> Option<Decimal> {
        Some(self.amount)
    }
}

impl Filterable for Expense {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.category.as_str(), self.description.as_str()];
        fields.extend(self.vendor.as_deref());
        fields.extend(self.reference.as_deref());
        fields
    }

    fn status_key(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        Some(self.incurred_on)
    }

    fn filter_amount(&self) -> Option<Decimal> {
        Some(self.amount)
    }
}

impl Filterable for Student {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.admission_number.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
        ];
        fields.extend(self.guardian_name.as_deref());
        fields.extend(self.guardian_phone.as_deref());
        fields
    }

    fn status_key(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        self.enrolled_on
    }
}

impl Filterable for Staff {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.role.as_str(),
        ];
        fields.extend(self.staff_number.as_deref());
        fields
    }

    fn status_key(&self) -> Option<&str> {
        Some(if self.is_active { "ACTIVE" } else { "INACTIVE" })
    }
}
