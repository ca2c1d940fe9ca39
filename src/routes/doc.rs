use utoipa::{
    Modify, OpenApi,
    openapi::{
        self, OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        bookings::{BookingList, CreateBookingRequest},
        stadiums::{CreateStadiumRequest, StadiumList, UpdateStadiumRequest},
    },
    models::{Booking, BookingStatus, Role, Stadium},
    response::{ApiResponse, Meta},
    routes::{bookings, health, params, stadiums},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        stadiums::list_stadiums,
        stadiums::get_stadium,
        stadiums::create_stadium,
        stadiums::update_stadium,
        stadiums::delete_stadium,
        bookings::list_my_bookings,
        bookings::list_all_bookings,
        bookings::create_booking,
        bookings::cancel_booking
    ),
    components(
        schemas(
            Stadium,
            Booking,
            BookingStatus,
            Role,
            CreateStadiumRequest,
            UpdateStadiumRequest,
            CreateBookingRequest,
            StadiumList,
            BookingList,
            health::HealthData,
            params::Pagination,
            params::SortOrder,
            params::StadiumSortBy,
            Meta,
            ApiResponse<Stadium>,
            ApiResponse<StadiumList>,
            ApiResponse<Booking>,
            ApiResponse<BookingList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Stadiums", description = "Stadium catalog endpoints"),
        (name = "Bookings", description = "Booking endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
