use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{BookingRow, BookingStatus, GroundId};

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub ground_id: Option<GroundId>,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
    pub include_cancelled: bool,
}

impl BookingFilter {
    fn matches(&self, row: &BookingRow) -> bool {
        self.ground_id.map_or(true, |g| row.ground_id == g)
            && self.from.map_or(true, |from| row.date >= from)
            && self.to.map_or(true, |to| row.date <= to)
            && (self.include_cancelled || row.status.is_active())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    /// Status moved to cancelled by this call.
    Cancelled(BookingRow),
    /// Booking was already cancelled; nothing changed.
    AlreadyCancelled(BookingRow),
    /// Booking exists but its status does not allow cancellation.
    NotCancellable(BookingRow),
}

/// Booking records. Rows are never removed; cancellation only flips the status.
#[derive(Debug, Default)]
pub struct BookingRepo {
    rows: RwLock<HashMap<Uuid, BookingRow>>,
}

impl BookingRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, row: BookingRow) -> BookingRow {
        self.rows.write().insert(row.id, row.clone());
        row
    }

    pub fn get_by_id(&self, id: Uuid) -> Option<BookingRow> {
        self.rows.read().get(&id).cloned()
    }

    /// Matching rows ordered by (date, start_time, ground_id).
    pub fn list(&self, filter: &BookingFilter) -> Vec<BookingRow> {
        let mut rows: Vec<BookingRow> = self
            .rows
            .read()
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (a.date, a.start_time, a.ground_id, a.created_at).cmp(&(
                b.date,
                b.start_time,
                b.ground_id,
                b.created_at,
            ))
        });
        rows
    }

    pub fn cancel(&self, id: Uuid) -> Option<CancelOutcome> {
        let mut rows = self.rows.write();
        let row = rows.get_mut(&id)?;

        let current = row.status;
        let outcome = match current {
            BookingStatus::Cancelled => CancelOutcome::AlreadyCancelled(row.clone()),
            status if status.can_transition_to(BookingStatus::Cancelled) => {
                row.status = BookingStatus::Cancelled;
                row.cancelled_at = Some(Utc::now());
                CancelOutcome::Cancelled(row.clone())
            }
            _ => CancelOutcome::NotCancellable(row.clone()),
        };
        Some(outcome)
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}
