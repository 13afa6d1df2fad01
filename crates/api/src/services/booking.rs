use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use infra::models::{BookingRow, BookingStatus, GroundId, GroundRow, TimeSlot, CLOSING_HOUR, OPENING_HOUR};
use infra::repos::{AvailabilityStore, BookingRepo, CancelOutcome, GroundCatalog};
use infra::ReservationError;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use uuid::Uuid;

use crate::services::clock::Clock;
use crate::services::slots::{self, Quote};

pub const MIN_DURATION: u8 = 1;
pub const MAX_DURATION: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("slot conflict: {0}")]
    SlotConflict(String),
    #[error("{0} not found")]
    NotFound(String),
}

impl BookingError {
    fn validation(msg: impl Into<String>) -> Self {
        BookingError::Validation(msg.into())
    }
}

impl From<ReservationError> for BookingError {
    fn from(e: ReservationError) -> Self {
        match e {
            ReservationError::InvalidRange { .. } => BookingError::Validation(e.to_string()),
            ReservationError::SlotConflict { .. }
            | ReservationError::Contended { .. }
            | ReservationError::DuplicateBooking(_) => BookingError::SlotConflict(e.to_string()),
        }
    }
}

/// A booking request as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub ground_id: GroundId,
    pub date: NaiveDate,
    /// Start hour; accepts `10` or `"10:00"`.
    #[serde(deserialize_with = "hour_of_day")]
    pub start_time: u8,
    pub duration: u8,
    pub team_name: String,
    pub contact_number: String,
}

/// Whole hour as `10` or `"HH:MM"` with zero minutes.
pub(crate) fn hour_of_day<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Hour {
        Number(u8),
        Text(String),
    }

    let text = match Hour::deserialize(deserializer)? {
        Hour::Number(h) => return Ok(h),
        Hour::Text(s) => s,
    };
    let invalid = || -> D::Error { serde::de::Error::custom(format!("invalid start time {text:?}")) };

    let mut parts = text.trim().split(':');
    let hour = parts.next().unwrap_or_default();
    let minutes = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }
    match minutes {
        Some(m) if m.is_empty() || !m.bytes().all(|b| b.is_ascii_digit()) => return Err(invalid()),
        Some(m) if m.bytes().any(|b| b != b'0') => {
            return Err(serde::de::Error::custom(format!(
                "start time {text:?} must be on the hour"
            )))
        }
        _ => {}
    }
    hour.parse().map_err(|_| invalid())
}

/// Validates, prices and reserves bookings. Cheap to clone; all state lives behind `Arc`s.
#[derive(Clone)]
pub struct BookingService {
    catalog: Arc<GroundCatalog>,
    availability: Arc<AvailabilityStore>,
    bookings: Arc<BookingRepo>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        catalog: Arc<GroundCatalog>,
        availability: Arc<AvailabilityStore>,
        bookings: Arc<BookingRepo>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            availability,
            bookings,
            clock,
        }
    }

    fn ground(&self, ground_id: GroundId) -> Result<&GroundRow, BookingError> {
        self.catalog
            .get(ground_id)
            .ok_or_else(|| BookingError::NotFound(format!("ground {}", ground_id)))
    }

    fn check_hours(start_hour: u8, duration: u8) -> Result<(), BookingError> {
        if !(MIN_DURATION..=MAX_DURATION).contains(&duration) {
            return Err(BookingError::validation(format!(
                "duration must be between {} and {} hours",
                MIN_DURATION, MAX_DURATION
            )));
        }
        if start_hour < OPENING_HOUR {
            return Err(BookingError::validation(format!(
                "ground opens at {:02}:00",
                OPENING_HOUR
            )));
        }
        if start_hour as u16 + duration as u16 > CLOSING_HOUR as u16 {
            return Err(BookingError::validation(format!(
                "booking cannot run past closing at {:02}:00",
                CLOSING_HOUR
            )));
        }
        Ok(())
    }

    /// Input checks in order; the first failing rule is reported.
    pub fn validate(&self, req: &CreateBooking) -> Result<(), BookingError> {
        if req.date < self.clock.today() {
            return Err(BookingError::validation("booking date is in the past"));
        }
        Self::check_hours(req.start_time, req.duration)?;
        if req.team_name.trim().is_empty() {
            return Err(BookingError::validation("team name is required"));
        }
        if req.contact_number.trim().is_empty() {
            return Err(BookingError::validation("contact number is required"));
        }
        Ok(())
    }

    pub fn create_booking(&self, req: CreateBooking) -> Result<BookingRow, BookingError> {
        self.validate(&req)?;
        let ground = self.ground(req.ground_id)?;

        let id = Uuid::new_v4();
        if let Err(e) =
            self.availability
                .reserve(req.ground_id, req.date, req.start_time, req.duration, id)
        {
            tracing::warn!(
                "Rejected booking for ground {} on {} {:02}:00+{}h: {}",
                req.ground_id,
                req.date,
                req.start_time,
                req.duration,
                e
            );
            return Err(e.into());
        }

        let quote = slots::quote(ground, req.date, req.start_time, req.duration);

        let row = self.bookings.create(BookingRow {
            id,
            ground_id: req.ground_id,
            date: req.date,
            start_time: req.start_time,
            duration: req.duration,
            team_name: req.team_name.trim().to_string(),
            contact_number: req.contact_number.trim().to_string(),
            total_cost: quote.total,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
            cancelled_at: None,
        });

        tracing::info!(
            "Confirmed booking {} for ground {} on {} {:02}:00+{}h, total {}",
            row.id,
            row.ground_id,
            row.date,
            row.start_time,
            row.duration,
            row.total_cost
        );
        Ok(row)
    }

    /// Cancel a booking. Cancelling an already cancelled booking returns it unchanged.
    pub fn cancel_booking(&self, id: Uuid) -> Result<BookingRow, BookingError> {
        match self.bookings.cancel(id) {
            None => Err(BookingError::NotFound(format!("booking {}", id))),
            Some(CancelOutcome::Cancelled(row)) => {
                self.availability.release(id);
                tracing::info!(
                    "Cancelled booking {} for ground {} on {}",
                    row.id,
                    row.ground_id,
                    row.date
                );
                Ok(row)
            }
            Some(CancelOutcome::AlreadyCancelled(row)) => {
                // Hours may still be held if an earlier release was interrupted.
                self.availability.release(id);
                Ok(row)
            }
            Some(CancelOutcome::NotCancellable(row)) => Err(BookingError::validation(format!(
                "booking {} is {} and cannot be cancelled",
                row.id,
                row.status.as_str()
            ))),
        }
    }

    pub fn get_booking(&self, id: Uuid) -> Result<BookingRow, BookingError> {
        self.bookings
            .get_by_id(id)
            .ok_or_else(|| BookingError::NotFound(format!("booking {}", id)))
    }

    /// Price a prospective booking without reserving anything.
    pub fn quote(
        &self,
        ground_id: GroundId,
        date: NaiveDate,
        start_hour: u8,
        duration: u8,
    ) -> Result<Quote, BookingError> {
        Self::check_hours(start_hour, duration)?;
        let ground = self.ground(ground_id)?;
        Ok(slots::quote(ground, date, start_hour, duration))
    }

    pub fn slots(&self, ground_id: GroundId, date: NaiveDate) -> Result<Vec<TimeSlot>, BookingError> {
        let ground = self.ground(ground_id)?;
        let occupancy = self.availability.occupancy(ground_id, date);
        Ok(slots::generate_slots(ground, date, &occupancy))
    }

    pub fn catalog(&self) -> &GroundCatalog {
        &self.catalog
    }
}
