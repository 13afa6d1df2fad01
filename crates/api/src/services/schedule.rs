use std::sync::Arc;

use chrono::{Days, NaiveDate};
use infra::models::{BookingRow, GroundId, LAST_SLOT_HOUR, OPENING_HOUR};
use infra::repos::{BookingFilter, BookingRepo, GroundCatalog};
use serde::Serialize;
use uuid::Uuid;

use crate::services::booking::BookingError;
use crate::services::clock::Clock;

/// Default span of a list view when no end date is given.
pub const DEFAULT_RANGE_DAYS: u64 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub hour: u8,
    pub booking_id: Option<Uuid>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekGrid {
    pub ground_id: GroundId,
    pub days: Vec<DayColumn>,
}

/// Read-only projections of existing bookings.
#[derive(Clone)]
pub struct ScheduleViewer {
    catalog: Arc<GroundCatalog>,
    bookings: Arc<BookingRepo>,
    clock: Arc<dyn Clock>,
}

impl ScheduleViewer {
    pub fn new(catalog: Arc<GroundCatalog>, bookings: Arc<BookingRepo>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            bookings,
            clock,
        }
    }

    fn ensure_ground(&self, ground_id: GroundId) -> Result<(), BookingError> {
        match self.catalog.get(ground_id) {
            Some(_) => Ok(()),
            None => Err(BookingError::NotFound(format!("ground {}", ground_id))),
        }
    }

    /// Resolve optional bounds: `from` defaults to today, `to` to `from + DEFAULT_RANGE_DAYS`.
    pub fn resolve_range(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<(NaiveDate, NaiveDate), BookingError> {
        let from = from.unwrap_or_else(|| self.clock.today());
        let to = match to {
            Some(to) => to,
            None => from
                .checked_add_days(Days::new(DEFAULT_RANGE_DAYS))
                .ok_or_else(|| BookingError::Validation("date range out of bounds".to_string()))?,
        };
        if from > to {
            return Err(BookingError::Validation(
                "`from` must not be after `to`".to_string(),
            ));
        }
        Ok((from, to))
    }

    /// Non-cancelled bookings dated within `[from, to]`, ordered by (date, start_time).
    pub fn get_schedule(
        &self,
        ground_id: Option<GroundId>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BookingRow>, BookingError> {
        if from > to {
            return Err(BookingError::Validation(
                "`from` must not be after `to`".to_string(),
            ));
        }
        if let Some(ground_id) = ground_id {
            self.ensure_ground(ground_id)?;
        }

        Ok(self.bookings.list(&BookingFilter {
            ground_id,
            from: Some(from),
            to: Some(to),
            include_cancelled: false,
        }))
    }

    /// Seven days starting at `week_start`, one cell per slot hour.
    pub fn week_grid(&self, ground_id: GroundId, week_start: NaiveDate) -> Result<WeekGrid, BookingError> {
        let week_end = week_start
            .checked_add_days(Days::new(6))
            .ok_or_else(|| BookingError::Validation("date range out of bounds".to_string()))?;
        let bookings = self.get_schedule(Some(ground_id), week_start, week_end)?;

        let days = week_start
            .iter_days()
            .take(7)
            .map(|date| {
                let day_bookings: Vec<&BookingRow> =
                    bookings.iter().filter(|b| b.date == date).collect();
                let cells = (OPENING_HOUR..=LAST_SLOT_HOUR)
                    .map(|hour| {
                        let owner = day_bookings.iter().find(|b| b.covers(hour));
                        GridCell {
                            hour,
                            booking_id: owner.map(|b| b.id),
                            team_name: owner.map(|b| b.team_name.clone()),
                        }
                    })
                    .collect();
                DayColumn { date, cells }
            })
            .collect();

        Ok(WeekGrid { ground_id, days })
    }
}
