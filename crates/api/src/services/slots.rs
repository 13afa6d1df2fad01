use chrono::{Datelike, NaiveDate, Weekday};
use infra::models::{GroundRow, TimeSlot, LAST_SLOT_HOUR, OPENING_HOUR};
use infra::repos::DayOccupancy;
use serde::Serialize;

pub const PEAK_MULTIPLIER: f64 = 1.5;
pub const WEEKEND_MULTIPLIER: f64 = 1.3;
pub const PLATFORM_FEE_RATE: f64 = 0.05;

/// Morning 06:00-09:00 and evening 17:00-22:00.
pub fn is_peak_hour(hour: u8) -> bool {
    (6..9).contains(&hour) || (17..22).contains(&hour)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Price of one hour: base, then peak markup, then weekend markup, rounded last.
pub fn hourly_price(ground: &GroundRow, date: NaiveDate, hour: u8) -> i64 {
    let mut price = ground.price_per_hour as f64;
    if is_peak_hour(hour) {
        price *= PEAK_MULTIPLIER;
    }
    if is_weekend(date) {
        price *= WEEKEND_MULTIPLIER;
    }
    price.round() as i64
}

pub fn platform_fee(subtotal: i64) -> i64 {
    (subtotal as f64 * PLATFORM_FEE_RATE).round() as i64
}

/// All slots of the day, `OPENING_HOUR..=LAST_SLOT_HOUR`, with availability taken from
/// `occupancy`.
pub fn generate_slots(ground: &GroundRow, date: NaiveDate, occupancy: &DayOccupancy) -> Vec<TimeSlot> {
    let weekend = is_weekend(date);
    (OPENING_HOUR..=LAST_SLOT_HOUR)
        .map(|hour| TimeSlot {
            ground_id: ground.id,
            date,
            hour,
            label: format!("{:02}:00", hour),
            price: hourly_price(ground, date, hour),
            is_peak: is_peak_hour(hour),
            is_weekend: weekend,
            available: occupancy.is_free(hour),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourPrice {
    pub hour: u8,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub hours: Vec<HourPrice>,
    pub subtotal: i64,
    pub platform_fee: i64,
    pub total: i64,
}

/// Cost of `duration` hours starting at `start_hour`, priced hour by hour.
pub fn quote(ground: &GroundRow, date: NaiveDate, start_hour: u8, duration: u8) -> Quote {
    let hours: Vec<HourPrice> = (start_hour..start_hour.saturating_add(duration))
        .map(|hour| HourPrice {
            hour,
            price: hourly_price(ground, date, hour),
        })
        .collect();
    let subtotal = hours.iter().map(|h| h.price).sum();
    let platform_fee = platform_fee(subtotal);

    Quote {
        hours,
        subtotal,
        platform_fee,
        total: subtotal + platform_fee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infra::repos::AvailabilityStore;
    use uuid::Uuid;

    fn ground(price_per_hour: i64) -> GroundRow {
        GroundRow {
            id: 1,
            name: "Green Park".to_string(),
            location: "Noida".to_string(),
            price_per_hour,
            amenities: vec![],
            rating: 4.5,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn peak_hours() {
        let peak: Vec<u8> = (0..24).filter(|h| is_peak_hour(*h)).collect();
        assert_eq!(peak, vec![6, 7, 8, 17, 18, 19, 20, 21]);
    }

    #[test]
    fn generates_seventeen_slots_priced_at_or_above_base() {
        let store = AvailabilityStore::new();
        for price in [1, 999, 1200, 2000, 2500] {
            let g = ground(price);
            for day in 20..=27 {
                let d = date(2025, 9, day);
                let slots = generate_slots(&g, d, &store.occupancy(1, d));
                assert_eq!(slots.len(), 17);
                assert_eq!(slots.first().map(|s| s.hour), Some(6));
                assert_eq!(slots.last().map(|s| s.hour), Some(22));
                assert!(slots.iter().all(|s| s.price >= price));
                assert!(slots.iter().all(|s| s.available));
            }
        }
    }

    #[test]
    fn applies_markups_in_order() {
        let g = ground(2000);
        let wednesday = date(2025, 9, 24);
        let saturday = date(2025, 9, 27);

        assert_eq!(hourly_price(&g, wednesday, 10), 2000);
        assert_eq!(hourly_price(&g, wednesday, 18), 3000);
        assert_eq!(hourly_price(&g, saturday, 10), 2600);
        assert_eq!(hourly_price(&g, saturday, 18), 3900);
        assert_eq!(hourly_price(&g, saturday, 22), 2600, "22:00 is off-peak");
    }

    #[test]
    fn rounds_to_nearest_unit() {
        // 333 * 1.5 = 499.5 -> 500; 333 * 1.3 = 432.9 -> 433
        let g = ground(333);
        assert_eq!(hourly_price(&g, date(2025, 9, 24), 7), 500);
        assert_eq!(hourly_price(&g, date(2025, 9, 27), 12), 433);
    }

    #[test]
    fn saturday_evening_quote() {
        let q = quote(&ground(2000), date(2025, 9, 27), 18, 2);
        assert_eq!(
            q.hours,
            vec![
                HourPrice { hour: 18, price: 3900 },
                HourPrice { hour: 19, price: 3900 },
            ]
        );
        assert_eq!(q.subtotal, 7800);
        assert_eq!(q.platform_fee, 390);
        assert_eq!(q.total, 8190);
    }

    #[test]
    fn quote_straddling_peak_boundary() {
        // Weekday 15:00-19:00: two off-peak hours then two peak hours.
        let q = quote(&ground(1000), date(2025, 9, 24), 15, 4);
        assert_eq!(q.subtotal, 1000 + 1000 + 1500 + 1500);
        assert_eq!(q.platform_fee, 250);
        assert_eq!(q.total, 5250);
    }

    #[test]
    fn reserved_hours_show_unavailable() {
        let store = AvailabilityStore::new();
        let d = date(2025, 9, 25);
        store.reserve(1, d, 10, 2, Uuid::new_v4()).unwrap();

        let slots = generate_slots(&ground(2000), d, &store.occupancy(1, d));
        let taken: Vec<u8> = slots.iter().filter(|s| !s.available).map(|s| s.hour).collect();
        assert_eq!(taken, vec![10, 11]);
        assert_eq!(slots[0].label, "06:00");
        assert_eq!(slots[4].end_hour(), 11);
    }
}
