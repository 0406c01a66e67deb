//! Bookable time-slot computation.
//!
//! Pure function of (day, busy intervals, config). Slots are recomputed from
//! the authoritative event list on every view and never persisted. All
//! instants are UTC.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::types::Timestamp;

/// Business-hours window and slot width.
#[derive(Debug, Clone, Copy)]
pub struct SlotConfig {
    /// First bookable hour of the day (slot start).
    pub start_hour: u32,
    /// Hour the window closes. Slots tile `[start_hour, end_hour)`.
    pub end_hour: u32,
    /// Slot width in minutes.
    pub slot_minutes: i64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 18,
            slot_minutes: 30,
        }
    }
}

/// An interval during which the calendar is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// A candidate appointment window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start: Timestamp,
    pub end: Timestamp,
    pub available: bool,
}

/// Tile `day`'s business hours with fixed-width slots, marking any slot that
/// overlaps a busy interval as unavailable.
///
/// A slot is occupied when its start falls inside an event, its end falls
/// inside an event (boundary inclusive), or it fully contains an event.
/// Partial overlap counts as occupied on both sides of a boundary.
pub fn generate_time_slots(
    day: NaiveDate,
    busy: &[BusyInterval],
    config: &SlotConfig,
) -> Vec<TimeSlot> {
    let day_start = day
        .and_hms_opt(config.start_hour, 0, 0)
        .expect("start_hour must be a valid hour")
        .and_utc();
    let day_end = day
        .and_hms_opt(config.end_hour, 0, 0)
        .expect("end_hour must be a valid hour")
        .and_utc();

    let width = Duration::minutes(config.slot_minutes);
    let mut slots = Vec::new();
    let mut current = day_start;

    while current < day_end {
        let slot_end = current + width;

        let occupied = busy.iter().any(|event| {
            (current >= event.start && current < event.end)
                || (slot_end > event.start && slot_end <= event.end)
                || (current <= event.start && slot_end >= event.end)
        });

        slots.push(TimeSlot {
            start: current,
            end: slot_end,
            available: !occupied,
        });

        current = slot_end;
    }

    slots
}
