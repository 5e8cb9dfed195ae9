use crate::domain::auth::AuthenticatedUser;
use crate::domain::fee_item::{FeeItem, NewFeeItem, NewGradeOverride};
use crate::domain::types::FeeItemId;
use crate::dto::finance::FeeItemsPageData;
use crate::forms::fee_items::{FeeItemForm, GradeOverrideForm};
use crate::repository::{FeeItemReader, FeeItemWriter};
use crate::services::{ServiceResult, ensure_finance};

/// Fee catalog with active items first, then by name.
pub async fn load_fee_items<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<FeeItemsPageData>
where
    R: FeeItemReader + ?Sized,
{
    ensure_finance(user)?;

    let mut fee_items = repo.list_fee_items().await.map_err(|err| {
        log::error!("Failed to list fee items: {err}");
        err
    })?;
    fee_items.sort_by(|a, b| {
        b.is_active
            .cmp(&a.is_active)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    Ok(FeeItemsPageData::new(fee_items))
}

pub async fn create_fee_item<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: FeeItemForm,
) -> ServiceResult<FeeItem>
where
    R: FeeItemWriter + ?Sized,
{
    ensure_finance(user)?;
    let payload = NewFeeItem::try_from(form)?;

    let fee_item = repo.create_fee_item(&payload).await.map_err(|err| {
        log::error!("Failed to create fee item {}: {err}", payload.name);
        err
    })?;
    log::info!("Fee item {} created by {}", fee_item.id, user.email);
    Ok(fee_item)
}

pub async fn update_fee_item<R>(
    repo: &R,
    user: &AuthenticatedUser,
    fee_item_id: i64,
    form: FeeItemForm,
) -> ServiceResult<FeeItem>
where
    R: FeeItemWriter + ?Sized,
{
    ensure_finance(user)?;
    let id = FeeItemId::new(fee_item_id)?;
    let payload = NewFeeItem::try_from(form)?;

    repo.update_fee_item(id, &payload).await.map_err(|err| {
        log::error!("Failed to update fee item {fee_item_id}: {err}");
        err.into()
    })
}

/// Adds an amount that replaces the default for one grade and term.
pub async fn add_grade_override<R>(
    repo: &R,
    user: &AuthenticatedUser,
    fee_item_id: i64,
    form: GradeOverrideForm,
) -> ServiceResult<FeeItem>
where
    R: FeeItemWriter + ?Sized,
{
    ensure_finance(user)?;
    let id = FeeItemId::new(fee_item_id)?;
    let payload = NewGradeOverride::try_from(form)?;

    repo.add_grade_override(id, &payload).await.map_err(|err| {
        log::error!("Failed to add override to fee item {fee_item_id}: {err}");
        err.into()
    })
}
