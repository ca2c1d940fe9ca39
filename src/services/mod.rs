pub mod booking_service;
pub mod stadium_service;
