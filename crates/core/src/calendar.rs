//! Derived calendar views
//!
//! Pure functions over fetched snapshots: the bookable list shown to
//! students, the tutor's schedule ordering, and month-grid day bucketing.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{AvailabilitySlot, BookingId, BookingRequest, DayOfWeek, ScheduleEntry, SlotId};

/// Slots a student may still request, soonest first.
///
/// Dated slots come first in date order, then weekly slots in Monday-first
/// order; ties break on start time.
pub fn bookable_slots(slots: &[AvailabilitySlot]) -> Vec<AvailabilitySlot> {
    let mut open: Vec<AvailabilitySlot> = slots.iter().filter(|s| s.is_bookable()).cloned().collect();
    open.sort_by(|a, b| {
        let key_a = (a.date.is_none(), a.date, a.weekday().map(|d| d.display_rank()), a.start_time);
        let key_b = (b.date.is_none(), b.date, b.weekday().map(|d| d.display_rank()), b.start_time);
        key_a.cmp(&key_b)
    });
    open
}

/// Order a weekly schedule Monday (1) first and Sunday (0) last
pub fn sort_schedule(entries: &mut [ScheduleEntry]) {
    entries.sort_by_key(|e| (e.day_of_week.display_rank(), e.start_time, e.end_time));
}

/// Group schedule entries per weekday, in display order. Empty days are kept.
pub fn schedule_by_day(entries: &[ScheduleEntry]) -> Vec<(DayOfWeek, Vec<ScheduleEntry>)> {
    DayOfWeek::DISPLAY_ORDER
        .iter()
        .map(|day| {
            let mut day_entries: Vec<ScheduleEntry> = entries
                .iter()
                .filter(|e| e.day_of_week == *day)
                .cloned()
                .collect();
            sort_schedule(&mut day_entries);
            (*day, day_entries)
        })
        .collect()
}

/// One cell of a month grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for leading/trailing days borrowed from adjacent months
    pub in_month: bool,
    pub slot_ids: Vec<SlotId>,
    pub booking_ids: Vec<BookingId>,
}

/// Monday-first month grid with slots and bookings bucketed per day
#[derive(Debug, Clone)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<CalendarDay>>,
}

impl CalendarMonth {
    /// Build the grid. Weekly slots are expanded onto every matching date;
    /// bookings are placed on their explicit date. Returns `None` for an
    /// invalid year/month.
    pub fn build(
        year: i32,
        month: u32,
        slots: &[AvailabilitySlot],
        bookings: &[BookingRequest],
    ) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let lead = DayOfWeek::of_date(first).display_rank() as i64;
        let grid_start = first - Duration::days(lead);

        let mut booking_days: BTreeMap<NaiveDate, Vec<BookingId>> = BTreeMap::new();
        for booking in bookings {
            if let Some(date) = booking.date {
                booking_days.entry(date).or_default().push(booking.id);
            }
        }

        let mut weeks = Vec::new();
        let mut cursor = grid_start;
        loop {
            let week: Vec<CalendarDay> = (0..7)
                .map(|offset| {
                    let date = cursor + Duration::days(offset);
                    CalendarDay {
                        date,
                        in_month: date.month() == month && date.year() == year,
                        slot_ids: slots
                            .iter()
                            .filter(|s| s.occurs_on(date))
                            .map(|s| s.id)
                            .collect(),
                        booking_ids: booking_days.get(&date).cloned().unwrap_or_default(),
                    }
                })
                .collect();
            weeks.push(week);
            cursor += Duration::days(7);

            // Stop once the grid has covered the last day of the month
            if cursor.month() != month || cursor.year() != year {
                break;
            }
        }

        Some(Self { year, month, weeks })
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.weeks.iter().flatten().find(|d| d.date == date)
    }

    /// In-month days that have at least one open slot
    pub fn days_with_slots(&self) -> Vec<NaiveDate> {
        self.weeks
            .iter()
            .flatten()
            .filter(|d| d.in_month && !d.slot_ids.is_empty())
            .map(|d| d.date)
            .collect()
    }
}
