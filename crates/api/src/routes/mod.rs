pub mod bookings;
pub mod grounds;
pub mod schedule;
pub mod session;
