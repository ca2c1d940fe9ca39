use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::stadiums::{CreateStadiumRequest, StadiumList, UpdateStadiumRequest},
    entity::{
        bookings::Entity as Bookings,
        stadiums::{ActiveModel, Amenities, Column, Entity as Stadiums},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Stadium,
    policy,
    response::{ApiResponse, Meta},
    routes::params::{SortOrder, StadiumQuery, StadiumSortBy},
    state::AppState,
};

pub async fn list_stadiums(
    state: &AppState,
    query: StadiumQuery,
) -> AppResult<ApiResponse<StadiumList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Location).ilike(pattern)),
        );
    }

    let sort_col = match query.sort_by.unwrap_or(StadiumSortBy::CreatedAt) {
        StadiumSortBy::CreatedAt => Column::CreatedAt,
        StadiumSortBy::PricePerHour => Column::PricePerHour,
        StadiumSortBy::Name => Column::Name,
        StadiumSortBy::Capacity => Column::Capacity,
    };

    let mut finder = Stadiums::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Stadium::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Stadiums",
        StadiumList { items },
        Some(meta),
    ))
}

pub async fn get_stadium(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Stadium>> {
    let stadium = Stadiums::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Stadium"))?;
    Ok(ApiResponse::success("Stadium", stadium.into(), None))
}

pub async fn create_stadium(
    state: &AppState,
    user: &AuthUser,
    payload: CreateStadiumRequest,
) -> AppResult<ApiResponse<Stadium>> {
    policy::ensure(policy::can_mutate_stadium(user))?;

    let stadium = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        location: Set(payload.location),
        capacity: Set(payload.capacity),
        price_per_hour: Set(payload.price_per_hour),
        description: Set(payload.description),
        amenities: Set(Amenities(payload.amenities)),
        image: Set(payload.image),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(stadium_id = %stadium.id, name = %stadium.name, "stadium created");

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.user_id),
        "stadium_create",
        Some("stadiums"),
        Some(serde_json::json!({ "stadium_id": stadium.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Stadium created",
        stadium.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_stadium(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateStadiumRequest,
) -> AppResult<ApiResponse<Stadium>> {
    policy::ensure(policy::can_mutate_stadium(user))?;

    let existing = Stadiums::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Stadium"))?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(location) = payload.location {
        active.location = Set(location);
    }
    if let Some(capacity) = payload.capacity {
        active.capacity = Set(capacity);
    }
    if let Some(price) = payload.price_per_hour {
        active.price_per_hour = Set(price);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(amenities) = payload.amenities {
        active.amenities = Set(Amenities(amenities));
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    active.updated_at = Set(Utc::now().into());

    let stadium = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.user_id),
        "stadium_update",
        Some("stadiums"),
        Some(serde_json::json!({ "stadium_id": stadium.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        stadium.into(),
        Some(Meta::empty()),
    ))
}

/// Deletes a stadium that no booking references. Booking history is never
/// orphaned: a referenced stadium is refused with a conflict.
pub async fn delete_stadium(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    policy::ensure(policy::can_mutate_stadium(user))?;

    let txn = state.orm.begin().await?;

    // Same row lock as admission, so no booking can land between the
    // reference check and the delete.
    let stadium = Stadiums::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Stadium"))?;

    let references = stadium.find_related(Bookings).count(&txn).await?;
    if references > 0 {
        return Err(AppError::Conflict(format!(
            "Stadium has {references} booking(s) and cannot be deleted"
        )));
    }

    stadium.delete(&txn).await?;
    txn.commit().await?;

    tracing::info!(stadium_id = %id, "stadium deleted");

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.user_id),
        "stadium_delete",
        Some("stadiums"),
        Some(serde_json::json!({ "stadium_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Stadium deleted successfully",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}
