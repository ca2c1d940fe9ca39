pub mod bookings;
pub mod stadiums;
