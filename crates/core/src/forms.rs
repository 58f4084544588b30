//! Client-side form validation
//!
//! Every form is checked here before a request body is built. A form that
//! fails validation never reaches the network.

use crate::error::ValidationError;
use crate::models::{
    parse_time_of_day, ClassSessionId, Credentials, DayOfWeek, NewBookingRequest, NewComment,
    NewPost, NewScheduleEntry, PostId, SlotId,
};

/// Student booking form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub selected_slot: Option<SlotId>,
    pub notes: String,
}

impl BookingForm {
    pub fn validate(&self) -> Result<NewBookingRequest, ValidationError> {
        let availability_id = self.selected_slot.ok_or(ValidationError::NoSlotSelected)?;
        Ok(NewBookingRequest {
            availability_id,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Tutor "add availability" dialog fields, as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleForm {
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
}

impl Default for ScheduleForm {
    fn default() -> Self {
        Self {
            day_of_week: DayOfWeek::Monday,
            start_time: String::new(),
            end_time: String::new(),
        }
    }
}

impl ScheduleForm {
    /// Both times must be present and well-formed. Overlap and ordering are
    /// left to the backend.
    pub fn validate(&self) -> Result<NewScheduleEntry, ValidationError> {
        let start_raw = self.start_time.trim();
        let end_raw = self.end_time.trim();

        if start_raw.is_empty() {
            return Err(ValidationError::MissingField("Start time"));
        }
        if end_raw.is_empty() {
            return Err(ValidationError::MissingField("End time"));
        }

        let start_time = parse_time_of_day(start_raw).ok_or_else(|| ValidationError::InvalidTime {
            field: "start",
            value: start_raw.to_string(),
        })?;
        let end_time = parse_time_of_day(end_raw).ok_or_else(|| ValidationError::InvalidTime {
            field: "end",
            value: end_raw.to_string(),
        })?;

        Ok(NewScheduleEntry {
            day_of_week: self.day_of_week,
            start_time,
            end_time,
        })
    }
}

/// New discussion post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
}

impl PostForm {
    pub fn validate(&self, session_id: ClassSessionId) -> Result<NewPost, ValidationError> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingField("Title"));
        }
        if content.is_empty() {
            return Err(ValidationError::MissingField("Content"));
        }
        Ok(NewPost {
            session_id,
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}

/// Validate a comment draft for a post
pub fn validate_comment(post_id: PostId, content: &str) -> Result<NewComment, ValidationError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::MissingField("Comment"));
    }
    Ok(NewComment {
        post_id,
        content: content.to_string(),
    })
}

/// Validate login input
pub fn validate_credentials(email: &str, password: &str) -> Result<Credentials, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField("Email"));
    }
    if password.is_empty() {
        return Err(ValidationError::MissingField("Password"));
    }
    Ok(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Session feedback rating
pub fn validate_rating(rating: u8) -> Result<u8, ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(rating)
    } else {
        Err(ValidationError::RatingOutOfRange(rating))
    }
}
