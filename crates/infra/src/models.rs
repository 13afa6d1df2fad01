use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;
use uuid::Uuid;

pub type GroundId = u32;

/// First bookable hour of the day.
pub const OPENING_HOUR: u8 = 6;
/// Hour at which the last slot starts; slots are generated for `OPENING_HOUR..=LAST_SLOT_HOUR`.
pub const LAST_SLOT_HOUR: u8 = 22;
/// No booking may run past this hour.
pub const CLOSING_HOUR: u8 = 22;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundRow {
    pub id: GroundId,
    pub name: String,
    pub location: String,
    pub price_per_hour: i64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub rating: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Allowed lifecycle moves. `Cancelled -> Cancelled` is accepted so that
    /// repeated cancellation stays a no-op.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
                | (BookingStatus::Cancelled, BookingStatus::Cancelled)
        )
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!("Unknown booking status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRow {
    pub id: Uuid,
    pub ground_id: GroundId,
    pub date: NaiveDate,
    pub start_time: u8,
    pub duration: u8,
    pub team_name: String,
    pub contact_number: String,
    pub total_cost: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl BookingRow {
    pub fn end_time(&self) -> u8 {
        self.start_time + self.duration
    }

    /// Covered hours, half-open.
    pub fn hours(&self) -> Range<u8> {
        self.start_time..self.end_time()
    }

    pub fn covers(&self, hour: u8) -> bool {
        self.hours().contains(&hour)
    }
}

/// A one-hour bookable window on a ground, priced for its date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub ground_id: GroundId,
    pub date: NaiveDate,
    pub hour: u8,
    pub label: String,
    pub price: i64,
    pub is_peak: bool,
    pub is_weekend: bool,
    pub available: bool,
}

impl TimeSlot {
    pub fn end_hour(&self) -> u8 {
        self.hour + 1
    }
}
