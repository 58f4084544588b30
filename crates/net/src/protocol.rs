//! REST endpoint paths and response envelopes
//!
//! All bodies are JSON with camelCase keys.

use serde::Deserialize;
use tutorhub_core::{BookingDecision, BookingId, ClassSessionId, ScheduleEntryId, User};

pub const LOGIN: &str = "/api/auth/login";
pub const LOGOUT: &str = "/api/auth/logout";
pub const CURRENT_USER: &str = "/api/user/me";
pub const AVAILABILITIES: &str = "/api/availabilities";
pub const MY_BOOKINGS: &str = "/api/my/bookings";
pub const REQUEST_BOOKING: &str = "/api/bookings/request";
pub const TUTOR_SCHEDULE: &str = "/api/tutor/schedule";
pub const TUTOR_BOOKING_REQUESTS: &str = "/api/tutor/booking-requests";
pub const COMMUNITY_SESSIONS: &str = "/api/community/sessions";
pub const COMMUNITY_POSTS: &str = "/api/community/posts";
pub const COMMUNITY_COMMENTS: &str = "/api/community/comments";

pub fn schedule_entry(id: ScheduleEntryId) -> String {
    format!("{}/{}", TUTOR_SCHEDULE, id)
}

pub fn booking_decision(id: BookingId, decision: BookingDecision) -> String {
    format!("{}/{}/{}", TUTOR_BOOKING_REQUESTS, id, decision.path_segment())
}

pub fn session_posts(session_id: ClassSessionId) -> String {
    format!("{}/{}", COMMUNITY_POSTS, session_id)
}

/// `GET /api/user/me` response
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUserResponse {
    pub user: User,
}

/// Error body shapes seen from the backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Best human-readable message from an error response body
pub fn error_message(body: &str, status_reason: Option<&str>) -> String {
    let from_json = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.trim().is_empty());

    if let Some(message) = from_json {
        return message;
    }

    let text = body.trim();
    if !text.is_empty() && !text.starts_with('{') && !text.starts_with('<') {
        return text.to_string();
    }

    status_reason.unwrap_or("Request failed").to_string()
}
