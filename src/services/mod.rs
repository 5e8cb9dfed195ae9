//! Business services: role checks, backend orchestration and derived values.
//!
//! Services are generic over the repository traits so they run against the
//! backend in production and against `MockRepository` in tests.

pub mod auth;
pub mod dashboard;
pub mod errors;
pub mod expenses;
pub mod fee_items;
pub mod invoices;
pub mod payments;
pub mod proxy;
pub mod refunds;
pub mod schools;
pub mod staff;
pub mod students;

#[cfg(test)]
pub(crate) mod fixtures;

pub use errors::{ServiceError, ServiceResult};

use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::{ADMIN_ROLE, FINANCE_ROLE};

/// Succeeds when the user holds any of the given roles. Admins pass every check.
pub fn ensure_role(user: &AuthenticatedUser, roles: &[&str]) -> ServiceResult<()> {
    if check_role(ADMIN_ROLE, &user.roles) || roles.iter().any(|r| check_role(r, &user.roles)) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Admin-only actions: approvals and school administration.
pub fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    ensure_role(user, &[ADMIN_ROLE])
}

/// Finance pages and mutations other than approvals.
pub fn ensure_finance(user: &AuthenticatedUser) -> ServiceResult<()> {
    ensure_role(user, &[FINANCE_ROLE])
}

/// Writes the rows as CSV with a header record.
pub(crate) fn write_csv<I>(header: &[&str], rows: I) -> ServiceResult<Vec<u8>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(header)
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| ServiceError::Internal(e.to_string()))
}
