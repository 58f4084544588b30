//! Booking requests and their status lifecycle

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::time::hhmm_opt;
use super::{SlotId, UserId};
use crate::error::{Error, Result};

pub type BookingId = i64;

/// Booking request status.
///
/// `Pending` is the only non-terminal state. A request never moves back to
/// `Pending` once decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Rejected)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
        )
    }

    /// Validate a transition, returning the new status
    pub fn transition(self, next: BookingStatus) -> Result<BookingStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition { from: self, to: next })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tutor decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingDecision {
    Confirm,
    Reject,
}

impl BookingDecision {
    /// Status the request ends up in
    pub fn target_status(&self) -> BookingStatus {
        match self {
            BookingDecision::Confirm => BookingStatus::Confirmed,
            BookingDecision::Reject => BookingStatus::Rejected,
        }
    }

    /// Trailing path segment of the decision endpoint
    pub fn path_segment(&self) -> &'static str {
        match self {
            BookingDecision::Confirm => "confirm",
            BookingDecision::Reject => "reject",
        }
    }
}

/// A student's request to reserve a slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub id: BookingId,
    pub student_id: UserId,
    pub tutor_id: UserId,
    #[serde(default)]
    pub availability_id: Option<SlotId>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub end_time: Option<NaiveTime>,
    pub status: BookingStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub tutor_name: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl BookingRequest {
    pub fn is_pending(&self) -> bool {
        self.status == BookingStatus::Pending
    }

    /// Whether the request names either a slot or an explicit window
    pub fn has_target(&self) -> bool {
        self.availability_id.is_some() || (self.date.is_some() && self.start_time.is_some())
    }
}

/// Request body for a new booking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookingRequest {
    pub availability_id: SlotId,
    pub notes: String,
}

/// Number of requests still awaiting a decision
pub fn pending_count(requests: &[BookingRequest]) -> usize {
    requests.iter().filter(|r| r.is_pending()).count()
}
