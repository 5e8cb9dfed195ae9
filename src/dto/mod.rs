//! DTO modules that bridge services with templates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::finance::filters::ListFilter;
use crate::pagination::PageSize;

pub mod api;
pub mod finance;
pub mod main;
pub mod schools;
pub mod staff;
pub mod students;

/// CSV download produced by an export service.
pub struct CsvExport {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Query string shared by the list pages: filters plus paging.
///
/// Values are kept as raw strings so a malformed bound is ignored instead of
/// failing the whole page.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub classroom_id: Option<String>,
    pub branch_id: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<String>,
}

/// Non-blank list parameters other than the page number.
#[derive(Serialize)]
struct ListParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_amount: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_amount: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    classroom_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    per_page: Option<&'a str>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_query_date(value: Option<&str>) -> Option<NaiveDate> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

fn parse_query_amount(value: Option<&str>) -> Option<Decimal> {
    value
        .map(|v| v.trim().replace(',', ""))
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<Decimal>().ok())
}

impl ListQuery {
    pub fn filter(&self) -> ListFilter {
        let mut filter = ListFilter::new()
            .date_range(
                parse_query_date(self.date_from.as_deref()),
                parse_query_date(self.date_to.as_deref()),
            )
            .amount_range(
                parse_query_amount(self.min_amount.as_deref()),
                parse_query_amount(self.max_amount.as_deref()),
            );
        if let Some(search) = &self.search {
            filter = filter.search(search.clone());
        }
        if let Some(status) = &self.status {
            filter = filter.status(status.clone());
        }
        filter
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self, default: usize) -> PageSize {
        PageSize::from_query(self.per_page.as_deref(), default)
    }

    /// Filters and page size as an encoded query string without the page
    /// number, e.g. `search=INV&status=PAID`. Empty when nothing is set.
    pub fn to_query_string(&self) -> String {
        let params = ListParams {
            search: non_blank(&self.search),
            status: non_blank(&self.status),
            date_from: non_blank(&self.date_from),
            date_to: non_blank(&self.date_to),
            min_amount: non_blank(&self.min_amount),
            max_amount: non_blank(&self.max_amount),
            classroom_id: non_blank(&self.classroom_id),
            branch_id: non_blank(&self.branch_id),
            per_page: non_blank(&self.per_page),
        };
        serde_html_form::to_string(&params).unwrap_or_else(|err| {
            log::warn!("Failed to encode list query: {err}");
            String::new()
        })
    }

    pub fn classroom(&self) -> Option<i64> {
        self.classroom_id.as_deref().and_then(|v| v.trim().parse().ok())
    }

    pub fn branch(&self) -> Option<i64> {
        self.branch_id.as_deref().and_then(|v| v.trim().parse().ok())
    }
}
