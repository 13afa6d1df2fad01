pub mod availability;
pub mod bookings;
pub mod grounds;

pub use availability::{AvailabilityStore, DayOccupancy, Reservation, MAX_RESERVE_ATTEMPTS};
pub use bookings::{BookingFilter, BookingRepo, CancelOutcome};
pub use grounds::GroundCatalog;
