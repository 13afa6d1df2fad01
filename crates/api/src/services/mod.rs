pub mod booking;
pub mod clock;
pub mod schedule;
pub mod slots;

pub use booking::{BookingError, BookingService, CreateBooking};
pub use clock::{Clock, FixedClock, SystemClock};
pub use schedule::{ScheduleViewer, WeekGrid};
pub use slots::{generate_slots, quote, Quote};
