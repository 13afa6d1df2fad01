use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ReservationError;
use crate::models::GroundId;

const HOURS_PER_DAY: usize = 24;

/// Shard lock attempts before `reserve` gives up with `Contended`.
pub const MAX_RESERVE_ATTEMPTS: usize = 3;

const DEFAULT_LOCK_WAIT: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ShardKey {
    ground_id: GroundId,
    date: NaiveDate,
}

/// Hour ownership for one ground on one date.
#[derive(Debug, Default)]
struct DaySheet {
    hours: [Option<Uuid>; HOURS_PER_DAY],
    version: u64,
}

impl DaySheet {
    fn first_conflict(&self, start: u8, duration: u8) -> Option<(u8, Uuid)> {
        (start..start + duration)
            .find_map(|hour| self.hours[hour as usize].map(|owner| (hour, owner)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub booking_id: Uuid,
    pub ground_id: GroundId,
    pub date: NaiveDate,
    pub start_hour: u8,
    pub duration: u8,
    /// Sheet version right after this reservation was written.
    pub version: u64,
}

/// Point-in-time copy of a day sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayOccupancy {
    hours: [Option<Uuid>; HOURS_PER_DAY],
    pub version: u64,
}

impl DayOccupancy {
    pub fn owner(&self, hour: u8) -> Option<Uuid> {
        self.hours.get(hour as usize).copied().flatten()
    }

    pub fn is_free(&self, hour: u8) -> bool {
        (hour as usize) < HOURS_PER_DAY && self.owner(hour).is_none()
    }
}

/// Per-(ground, date) occupancy. Each shard is guarded by its own mutex so
/// overlapping `reserve` calls on the same day are serialized while other
/// grounds and dates proceed independently.
pub struct AvailabilityStore {
    shards: RwLock<HashMap<ShardKey, Arc<Mutex<DaySheet>>>>,
    reservations: Mutex<HashMap<Uuid, Reservation>>,
    lock_wait: Duration,
}

impl Default for AvailabilityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityStore {
    pub fn new() -> Self {
        Self::with_lock_wait(DEFAULT_LOCK_WAIT)
    }

    pub fn with_lock_wait(lock_wait: Duration) -> Self {
        Self {
            shards: RwLock::new(HashMap::new()),
            reservations: Mutex::new(HashMap::new()),
            lock_wait,
        }
    }

    fn existing_shard(&self, key: &ShardKey) -> Option<Arc<Mutex<DaySheet>>> {
        self.shards.read().get(key).cloned()
    }

    fn shard(&self, key: ShardKey) -> Arc<Mutex<DaySheet>> {
        if let Some(shard) = self.existing_shard(&key) {
            return shard;
        }
        self.shards.write().entry(key).or_default().clone()
    }

    fn fits_in_day(start_hour: u8, duration: u8) -> bool {
        duration > 0 && (start_hour as usize + duration as usize) <= HOURS_PER_DAY
    }

    pub fn is_free(&self, ground_id: GroundId, date: NaiveDate, start_hour: u8, duration: u8) -> bool {
        if !Self::fits_in_day(start_hour, duration) {
            return false;
        }
        match self.existing_shard(&ShardKey { ground_id, date }) {
            Some(shard) => shard.lock().first_conflict(start_hour, duration).is_none(),
            None => true,
        }
    }

    pub fn occupancy(&self, ground_id: GroundId, date: NaiveDate) -> DayOccupancy {
        match self.existing_shard(&ShardKey { ground_id, date }) {
            Some(shard) => {
                let sheet = shard.lock();
                DayOccupancy {
                    hours: sheet.hours,
                    version: sheet.version,
                }
            }
            None => DayOccupancy::default(),
        }
    }

    /// Atomically claim `[start_hour, start_hour + duration)` for `booking_id`.
    pub fn reserve(
        &self,
        ground_id: GroundId,
        date: NaiveDate,
        start_hour: u8,
        duration: u8,
        booking_id: Uuid,
    ) -> Result<Reservation, ReservationError> {
        if !Self::fits_in_day(start_hour, duration) {
            return Err(ReservationError::InvalidRange {
                start: start_hour,
                duration,
            });
        }

        let shard = self.shard(ShardKey { ground_id, date });

        for attempt in 1..=MAX_RESERVE_ATTEMPTS {
            let Some(mut sheet) = shard.try_lock_for(self.lock_wait) else {
                tracing::debug!(
                    "Shard for ground {} on {} busy (attempt {}/{})",
                    ground_id,
                    date,
                    attempt,
                    MAX_RESERVE_ATTEMPTS
                );
                continue;
            };

            if let Some((hour, held_by)) = sheet.first_conflict(start_hour, duration) {
                return Err(ReservationError::SlotConflict {
                    ground_id,
                    date,
                    hour,
                    held_by,
                });
            }

            let mut reservations = self.reservations.lock();
            if reservations.contains_key(&booking_id) {
                return Err(ReservationError::DuplicateBooking(booking_id));
            }

            for hour in start_hour..start_hour + duration {
                sheet.hours[hour as usize] = Some(booking_id);
            }
            sheet.version += 1;

            let reservation = Reservation {
                booking_id,
                ground_id,
                date,
                start_hour,
                duration,
                version: sheet.version,
            };
            reservations.insert(booking_id, reservation.clone());
            return Ok(reservation);
        }

        Err(ReservationError::Contended {
            ground_id,
            date,
            attempts: MAX_RESERVE_ATTEMPTS,
        })
    }

    /// Free the hours held by `booking_id`. Unknown or already released ids are a no-op.
    pub fn release(&self, booking_id: Uuid) -> Option<Reservation> {
        // Index lock is dropped before the shard lock is taken; `reserve` takes them in
        // the opposite order.
        let reservation = self.reservations.lock().remove(&booking_id)?;

        let key = ShardKey {
            ground_id: reservation.ground_id,
            date: reservation.date,
        };
        if let Some(shard) = self.existing_shard(&key) {
            let mut sheet = shard.lock();
            for hour in reservation.start_hour..reservation.start_hour + reservation.duration {
                let slot = &mut sheet.hours[hour as usize];
                if *slot == Some(booking_id) {
                    *slot = None;
                }
            }
            sheet.version += 1;
        }

        Some(reservation)
    }

    pub fn reservation(&self, booking_id: Uuid) -> Option<Reservation> {
        self.reservations.lock().get(&booking_id).cloned()
    }
}
