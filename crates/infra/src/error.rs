use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::GroundId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    #[error("ground {ground_id} on {date} hour {hour} is held by booking {held_by}")]
    SlotConflict {
        ground_id: GroundId,
        date: NaiveDate,
        hour: u8,
        held_by: Uuid,
    },
    #[error("ground {ground_id} on {date} stayed locked after {attempts} attempts")]
    Contended {
        ground_id: GroundId,
        date: NaiveDate,
        attempts: usize,
    },
    #[error("hour range {start}+{duration} does not fit in a day")]
    InvalidRange { start: u8, duration: u8 },
    #[error("booking {0} already holds a reservation")]
    DuplicateBooking(Uuid),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid ground catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate ground id {0}")]
    DuplicateId(GroundId),
    #[error("ground {0} must have a positive hourly price")]
    InvalidPrice(GroundId),
}
