use futures_util::try_join;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::staff::{NewStaff, Staff};
use crate::domain::types::{BranchId, StaffId};
use crate::dto::ListQuery;
use crate::dto::staff::StaffPageData;
use crate::forms::staff::{STAFF_ROLES, StaffForm};
use crate::pagination::paginate;
use crate::repository::{BranchReader, StaffListQuery, StaffReader, StaffWriter};
use crate::services::{ServiceResult, ensure_admin};

/// Lists staff members, narrowed by branch on the backend.
pub async fn load_staff<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ListQuery,
    per_page: usize,
) -> ServiceResult<StaffPageData>
where
    R: StaffReader + BranchReader + ?Sized,
{
    ensure_admin(user)?;

    let mut list_query = StaffListQuery::new();
    if let Some(id) = query.branch().and_then(|id| BranchId::new(id).ok()) {
        list_query = list_query.branch(id);
    }

    let (staff, branches) = try_join!(repo.list_staff(list_query), repo.list_branches())
        .map_err(|err| {
            log::error!("Failed to list staff: {err}");
            err
        })?;

    let staff = query.filter().apply(staff);
    let staff = paginate(staff, query.page(), query.page_size(per_page));

    Ok(StaffPageData {
        staff,
        branches,
        roles: STAFF_ROLES.to_vec(),
        query,
    })
}

pub async fn create_staff<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: StaffForm,
) -> ServiceResult<Staff>
where
    R: StaffWriter + ?Sized,
{
    ensure_admin(user)?;
    let payload = NewStaff::try_from(form)?;

    let staff = repo.create_staff(&payload).await.map_err(|err| {
        log::error!("Failed to create staff member {}: {err}", payload.email);
        err
    })?;
    log::info!("Staff member {} added by {}", staff.id, user.email);
    Ok(staff)
}

pub async fn update_staff<R>(
    repo: &R,
    user: &AuthenticatedUser,
    staff_id: i64,
    form: StaffForm,
) -> ServiceResult<Staff>
where
    R: StaffWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = StaffId::new(staff_id)?;
    let payload = NewStaff::try_from(form)?;

    repo.update_staff(id, &payload).await.map_err(|err| {
        log::error!("Failed to update staff member {staff_id}: {err}");
        err.into()
    })
}
