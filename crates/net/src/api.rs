//! The backend as seen by the client
//!
//! This trait is the seam between view models and the transport, so pages
//! can run against the HTTP client or an in-memory backend in tests.

use tutorhub_core::{
    AvailabilitySlot, BookingDecision, BookingId, BookingRequest, ClassSession, ClassSessionId,
    Credentials, NewBookingRequest, NewComment, NewPost, NewScheduleEntry, Post, ScheduleEntry,
    ScheduleEntryId, User,
};

use crate::error::Result;

#[async_trait::async_trait]
pub trait TutoringApi: Send + Sync {
    /// Exchange credentials for a session cookie
    async fn login(&self, credentials: &Credentials) -> Result<()>;

    /// Who the current session belongs to
    async fn current_user(&self) -> Result<User>;

    /// Invalidate the current session
    async fn logout(&self) -> Result<()>;

    /// All availability slots, booked ones included
    async fn list_availabilities(&self) -> Result<Vec<AvailabilitySlot>>;

    /// Booking requests made by the current student
    async fn my_bookings(&self) -> Result<Vec<BookingRequest>>;

    /// Request a slot
    async fn request_booking(&self, request: &NewBookingRequest) -> Result<BookingRequest>;

    /// The current tutor's weekly template
    async fn tutor_schedule(&self) -> Result<Vec<ScheduleEntry>>;

    /// Add a weekly availability entry
    async fn create_schedule_entry(&self, entry: &NewScheduleEntry) -> Result<ScheduleEntry>;

    /// Remove a weekly availability entry
    async fn delete_schedule_entry(&self, id: ScheduleEntryId) -> Result<()>;

    /// Requests addressed to the current tutor
    async fn tutor_booking_requests(&self) -> Result<Vec<BookingRequest>>;

    /// Confirm or reject a pending request
    async fn decide_booking_request(
        &self,
        id: BookingId,
        decision: BookingDecision,
    ) -> Result<BookingRequest>;

    /// Class sessions with discussion boards
    async fn community_sessions(&self) -> Result<Vec<ClassSession>>;

    /// Posts (with comments) for one class session
    async fn community_posts(&self, session_id: ClassSessionId) -> Result<Vec<Post>>;

    async fn create_post(&self, post: &NewPost) -> Result<()>;

    async fn create_comment(&self, comment: &NewComment) -> Result<()>;
}
