use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::{bookings::Model as BookingModel, stadiums::Model as StadiumModel},
    slot::{TimeSlot, hhmm, hhmm_end, iso_date},
};

pub use crate::entity::bookings::BookingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stadium {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub price_per_hour: f64,
    pub description: Option<String>,
    pub amenities: Vec<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StadiumModel> for Stadium {
    fn from(model: StadiumModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            location: model.location,
            capacity: model.capacity,
            price_per_hour: model.price_per_hour,
            description: model.description,
            amenities: model.amenities.0,
            image: model.image,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// A reservation with its stadium embedded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stadium: Stadium,
    #[serde(with = "iso_date")]
    #[schema(value_type = String, format = Date, example = "2025-06-15")]
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm_end")]
    #[schema(value_type = String, example = "11:00")]
    pub end_time: NaiveTime,
    pub duration: f64,
    pub total_price: f64,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn from_parts(model: BookingModel, stadium: Stadium) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            stadium,
            date: model.date,
            start_time: model.start_time,
            end_time: model.end_time,
            duration: model.duration,
            total_price: model.total_price,
            notes: model.notes,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }

    pub fn slot(&self) -> TimeSlot {
        TimeSlot::between(self.start_time, self.end_time)
    }
}
