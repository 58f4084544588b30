//! Availability slots and the tutor's weekly schedule

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::time::{hhmm, DayOfWeek};
use super::UserId;

pub type SlotId = i64;
pub type ScheduleEntryId = i64;

/// A tutor-declared window a student can request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub id: SlotId,
    pub tutor_id: UserId,
    #[serde(default)]
    pub tutor_name: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    /// Recurring weekly slot
    #[serde(default)]
    pub day_of_week: Option<DayOfWeek>,
    /// One-off slot on a concrete date
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub is_booked: bool,
}

impl AvailabilitySlot {
    pub fn is_bookable(&self) -> bool {
        !self.is_booked
    }

    /// Weekday this slot falls on, from either representation
    pub fn weekday(&self) -> Option<DayOfWeek> {
        self.day_of_week.or_else(|| self.date.map(DayOfWeek::of_date))
    }

    /// Whether the slot occurs on the given date
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        match (self.date, self.day_of_week) {
            (Some(d), _) => d == date,
            (None, Some(day)) => DayOfWeek::of_date(date) == day,
            (None, None) => false,
        }
    }

    /// Human-readable "when" label
    pub fn when_label(&self) -> String {
        let day = match (self.date, self.day_of_week) {
            (Some(d), _) => d.format("%a %Y-%m-%d").to_string(),
            (None, Some(day)) => format!("every {}", day.display_name()),
            (None, None) => "unscheduled".to_string(),
        };
        format!(
            "{} {}-{}",
            day,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

/// One row of a tutor's weekly availability template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: ScheduleEntryId,
    pub day_of_week: DayOfWeek,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

/// Request body for a new weekly availability entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduleEntry {
    pub day_of_week: DayOfWeek,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}
