//! Branches and classrooms.

use futures_util::try_join;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::school::{BranchProfile, Classroom, NewBranch, NewClassroom};
use crate::domain::types::BranchId;
use crate::dto::schools::{BranchesPageData, ClassroomsPageData};
use crate::forms::schools::{BranchForm, ClassroomForm};
use crate::repository::{
    BranchReader, BranchWriter, ClassroomListQuery, ClassroomReader, ClassroomWriter,
    StaffListQuery, StaffReader,
};
use crate::services::{ServiceResult, ensure_admin};

pub async fn load_branches<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<BranchesPageData>
where
    R: BranchReader + ?Sized,
{
    ensure_admin(user)?;

    let mut branches = repo.list_branches().await.map_err(|err| {
        log::error!("Failed to list branches: {err}");
        err
    })?;
    branches.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    Ok(BranchesPageData { branches })
}

pub async fn create_branch<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: BranchForm,
) -> ServiceResult<BranchProfile>
where
    R: BranchWriter + ?Sized,
{
    ensure_admin(user)?;
    let payload = NewBranch::try_from(form)?;

    let branch = repo.create_branch(&payload).await.map_err(|err| {
        log::error!("Failed to create branch {}: {err}", payload.name);
        err
    })?;
    log::info!("Branch {} created by {}", branch.id, user.email);
    Ok(branch)
}

pub async fn update_branch<R>(
    repo: &R,
    user: &AuthenticatedUser,
    branch_id: i64,
    form: BranchForm,
) -> ServiceResult<BranchProfile>
where
    R: BranchWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = BranchId::new(branch_id)?;
    let payload = NewBranch::try_from(form)?;

    repo.update_branch(id, &payload).await.map_err(|err| {
        log::error!("Failed to update branch {branch_id}: {err}");
        err.into()
    })
}

/// Classrooms, optionally for one branch, with the teachers that can be
/// assigned to them.
pub async fn load_classrooms<R>(
    repo: &R,
    user: &AuthenticatedUser,
    branch_id: Option<i64>,
) -> ServiceResult<ClassroomsPageData>
where
    R: ClassroomReader + BranchReader + StaffReader + ?Sized,
{
    ensure_admin(user)?;

    let branch = branch_id.and_then(|id| BranchId::new(id).ok());
    let mut query = ClassroomListQuery::new();
    if let Some(id) = branch {
        query = query.branch(id);
    }

    let (mut classrooms, branches, staff) = try_join!(
        repo.list_classrooms(query),
        repo.list_branches(),
        repo.list_staff(StaffListQuery::new().role("TEACHER")),
    )
    .map_err(|err| {
        log::error!("Failed to list classrooms: {err}");
        err
    })?;
    classrooms.sort_by(|a, b| a.grade.cmp(&b.grade).then_with(|| a.name.cmp(&b.name)));

    Ok(ClassroomsPageData {
        classrooms,
        branches,
        teachers: staff.into_iter().filter(|s| s.is_active).collect(),
        selected_branch: branch.map(BranchId::get),
    })
}

pub async fn create_classroom<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ClassroomForm,
) -> ServiceResult<Classroom>
where
    R: ClassroomWriter + ?Sized,
{
    ensure_admin(user)?;
    let payload = NewClassroom::try_from(form)?;

    let classroom = repo.create_classroom(&payload).await.map_err(|err| {
        log::error!("Failed to create classroom {}: {err}", payload.name);
        err
    })?;
    log::info!("Classroom {} created by {}", classroom.id, user.email);
    Ok(classroom)
}
