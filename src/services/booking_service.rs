use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    config::DurationPolicy,
    dto::bookings::{BookingList, CreateBookingRequest},
    entity::{
        bookings::{
            ActiveModel as BookingActive, BookingStatus, Column as BookingCol,
            Entity as Bookings, Model as BookingModel,
        },
        stadiums::{Entity as Stadiums, Model as StadiumModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Booking,
    policy,
    response::{ApiResponse, Meta},
    routes::params::BookingListQuery,
    slot::TimeSlot,
    state::AppState,
};

pub const SLOT_TAKEN: &str = "Stadium is already booked for this time slot";

/// Admit a booking if its slot is free on that stadium and date.
///
/// The stadium row is locked `FOR UPDATE` for the whole transaction, so
/// concurrent admissions for the same stadium run one after another and the
/// conflict scan always sees every committed booking.
pub async fn request_booking(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let slot = TimeSlot::new(payload.start_time, payload.end_time)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    check_duration(state.config.duration_policy, &slot, payload.duration)?;

    let txn = state.orm.begin().await?;

    let stadium = Stadiums::find_by_id(payload.stadium_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Stadium"))?;

    let booked = Bookings::find()
        .filter(
            Condition::all()
                .add(BookingCol::StadiumId.eq(stadium.id))
                .add(BookingCol::Date.eq(payload.date))
                .add(BookingCol::Status.ne(BookingStatus::Cancelled)),
        )
        .all(&txn)
        .await?;

    if let Some(existing) = find_conflict(&slot, &booked) {
        tracing::debug!(
            stadium_id = %stadium.id,
            date = %payload.date,
            conflicting_booking = %existing.id,
            "slot rejected"
        );
        return Err(AppError::Conflict(SLOT_TAKEN.into()));
    }

    let booking = BookingActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        stadium_id: Set(stadium.id),
        date: Set(payload.date),
        start_time: Set(payload.start_time),
        end_time: Set(payload.end_time),
        duration: Set(payload.duration),
        total_price: Set(quote_price(payload.duration, stadium.price_per_hour)),
        notes: Set(payload.notes),
        status: Set(BookingStatus::Pending),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        booking_id = %booking.id,
        stadium_id = %stadium.id,
        user_id = %user.user_id,
        total_price = booking.total_price,
        "booking admitted"
    );

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.user_id),
        "booking_create",
        Some("bookings"),
        Some(serde_json::json!({ "booking_id": booking.id, "stadium_id": stadium.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Booking created",
        Booking::from_parts(booking, stadium.into()),
        Some(Meta::empty()),
    ))
}

pub async fn list_my_bookings(
    state: &AppState,
    user: &AuthUser,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    let condition = Condition::all().add(BookingCol::UserId.eq(user.user_id));
    list_bookings(state, condition, query).await
}

pub async fn list_all_bookings(
    state: &AppState,
    user: &AuthUser,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    policy::ensure(policy::can_view_all_bookings(user))?;
    list_bookings(state, Condition::all(), query).await
}

/// Move a booking to `cancelled`. Cancelling twice is a no-op success;
/// price and duration are never touched.
pub async fn cancel_booking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Booking>> {
    let (booking, stadium) = Bookings::find_by_id(id)
        .find_also_related(Stadiums)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Booking"))?;

    policy::ensure(policy::can_cancel(user, booking.user_id))?;

    let booking = if booking.status == BookingStatus::Cancelled {
        booking
    } else {
        let mut active: BookingActive = booking.into();
        active.status = Set(BookingStatus::Cancelled);
        active.updated_at = Set(Utc::now().into());
        let booking = active.update(&state.orm).await?;

        tracing::info!(booking_id = %booking.id, user_id = %user.user_id, "booking cancelled");

        if let Err(err) = log_audit(
            &state.orm,
            Some(user.user_id),
            "booking_cancel",
            Some("bookings"),
            Some(serde_json::json!({ "booking_id": booking.id })),
        )
        .await
        {
            tracing::warn!(error = %err, "audit log failed");
        }
        booking
    };

    let booking = denormalize((booking, stadium))?;
    Ok(ApiResponse::success(
        "Booking cancelled",
        booking,
        Some(Meta::empty()),
    ))
}

async fn list_bookings(
    state: &AppState,
    mut condition: Condition,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    let (page, limit, offset) = query.pagination().normalize();
    if let Some(status) = query.status {
        condition = condition.add(BookingCol::Status.eq(status));
    }
    if let Some(date) = query.date {
        condition = condition.add(BookingCol::Date.eq(date));
    }

    let total = Bookings::find()
        .filter(condition.clone())
        .count(&state.orm)
        .await? as i64;

    let items = Bookings::find()
        .find_also_related(Stadiums)
        .filter(condition)
        .order_by_desc(BookingCol::CreatedAt)
        .order_by_desc(BookingCol::Id)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(denormalize)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Bookings", BookingList { items }, Some(meta)))
}

fn denormalize((booking, stadium): (BookingModel, Option<StadiumModel>)) -> AppResult<Booking> {
    let stadium = stadium.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "booking {} references missing stadium {}",
            booking.id,
            booking.stadium_id
        ))
    })?;
    Ok(Booking::from_parts(booking, stadium.into()))
}

/// First live booking whose slot overlaps `slot`, if any.
pub fn find_conflict<'a>(slot: &TimeSlot, booked: &'a [BookingModel]) -> Option<&'a BookingModel> {
    booked.iter().find(|existing| {
        existing.status != BookingStatus::Cancelled
            && slot.overlaps(&TimeSlot::between(existing.start_time, existing.end_time))
    })
}

pub fn check_duration(policy: DurationPolicy, slot: &TimeSlot, duration: f64) -> AppResult<()> {
    match policy {
        DurationPolicy::Waived => Ok(()),
        DurationPolicy::Enforced => {
            let span = slot.span_hours();
            if (span - duration).abs() > 1e-9 {
                return Err(AppError::BadRequest(format!(
                    "duration {duration}h does not match the {span}h slot"
                )));
            }
            Ok(())
        }
    }
}

/// Total for the booking, fixed at admission time.
pub fn quote_price(duration: f64, price_per_hour: f64) -> f64 {
    duration * price_per_hour
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::{parse_end_time, parse_time};
    use chrono::NaiveDate;

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot::new(parse_time(start).unwrap(), parse_end_time(end).unwrap()).unwrap()
    }

    fn booked(start: &str, end: &str, status: BookingStatus) -> BookingModel {
        let now = Utc::now().fixed_offset();
        BookingModel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            stadium_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            start_time: parse_time(start).unwrap(),
            end_time: parse_end_time(end).unwrap(),
            duration: 1.0,
            total_price: 100.0,
            notes: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn walks_through_a_days_admissions() {
        let b1 = booked("09:00", "11:00", BookingStatus::Pending);
        let b2 = booked("11:00", "12:00", BookingStatus::Pending);
        let day = vec![b1.clone(), b2];

        assert_eq!(find_conflict(&slot("10:00", "10:30"), &day).map(|b| b.id), Some(b1.id));
        assert_eq!(find_conflict(&slot("08:00", "09:30"), &day).map(|b| b.id), Some(b1.id));
        assert!(find_conflict(&slot("12:00", "13:00"), &day).is_none());
        assert!(find_conflict(&slot("07:00", "09:00"), &day).is_none());
    }

    #[test]
    fn bookings_running_to_midnight_block_only_the_late_evening() {
        let last = booked("23:00", "24:00", BookingStatus::Pending);
        let day = vec![last.clone()];

        assert!(find_conflict(&slot("22:00", "23:00"), &day).is_none());
        assert_eq!(find_conflict(&slot("23:30", "24:00"), &day).map(|b| b.id), Some(last.id));
        assert!(find_conflict(&slot("00:00", "01:00"), &day).is_none());
    }

    #[test]
    fn cancelled_bookings_free_their_slot() {
        let day = vec![booked("09:00", "11:00", BookingStatus::Cancelled)];
        assert!(find_conflict(&slot("10:00", "10:30"), &day).is_none());
    }

    #[test]
    fn duration_is_only_checked_when_enforced() {
        let two_hours = slot("09:00", "11:00");
        assert!(check_duration(DurationPolicy::Waived, &two_hours, 5.0).is_ok());
        assert!(check_duration(DurationPolicy::Enforced, &two_hours, 2.0).is_ok());
        assert!(matches!(
            check_duration(DurationPolicy::Enforced, &two_hours, 1.5),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn price_is_duration_times_hourly_rate() {
        assert_eq!(quote_price(2.0, 100.0), 200.0);
        assert_eq!(quote_price(0.5, 100.0), 50.0);
        assert_eq!(quote_price(1.5, 49.5), 74.25);
    }
}
