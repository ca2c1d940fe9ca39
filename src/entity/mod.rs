pub mod audit_logs;
pub mod bookings;
pub mod stadiums;
