//! In-memory backend for view model tests
//!
//! Enforces the same rules the real backend does: first booking of a slot
//! wins, decided requests stay decided, overlapping availability is refused.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveTime, TimeZone, Utc};
use tokio::sync::Notify;
use tutorhub_core::{
    AvailabilitySlot, BookingDecision, BookingId, BookingRequest, BookingStatus, ClassSession,
    ClassSessionId, Comment, Credentials, DayOfWeek, NewBookingRequest, NewComment, NewPost,
    NewScheduleEntry, Post, PostId, Role, ScheduleEntry, ScheduleEntryId, User,
};
use tutorhub_net::{Error, Result, TutoringApi};

use crate::state::{lock, AppState};

pub fn student() -> User {
    User {
        id: 1,
        name: "Lee Park".to_string(),
        email: "lee@uni.edu".to_string(),
        role: Role::Student,
        faculty: Some("Science".to_string()),
        phone: None,
        bio: None,
        student_id: Some("S1001".to_string()),
        subjects: vec!["Mathematics".to_string()],
    }
}

pub fn tutor() -> User {
    User {
        id: 2,
        name: "Dana Ortiz".to_string(),
        email: "dana@uni.edu".to_string(),
        role: Role::Tutor,
        faculty: Some("Science".to_string()),
        phone: None,
        bio: None,
        student_id: None,
        subjects: vec!["Mathematics".to_string()],
    }
}

pub fn admin() -> User {
    User {
        id: 3,
        name: "Ada Admin".to_string(),
        email: "admin@uni.edu".to_string(),
        role: Role::Admin,
        faculty: None,
        phone: None,
        bio: None,
        student_id: None,
        subjects: Vec::new(),
    }
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn weekly_slot(id: i64, day: DayOfWeek, hour: u32, booked: bool) -> AvailabilitySlot {
    AvailabilitySlot {
        id,
        tutor_id: 2,
        tutor_name: Some("Dana Ortiz".to_string()),
        subject: Some("Mathematics".to_string()),
        day_of_week: Some(day),
        date: None,
        start_time: time(hour, 0),
        end_time: time(hour + 1, 0),
        is_booked: booked,
    }
}

pub fn pending_request(id: BookingId, slot_id: i64) -> BookingRequest {
    BookingRequest {
        id,
        student_id: 1,
        tutor_id: 2,
        availability_id: Some(slot_id),
        date: None,
        start_time: None,
        end_time: None,
        status: BookingStatus::Pending,
        notes: None,
        meeting_link: None,
        student_name: Some("Lee Park".to_string()),
        tutor_name: Some("Dana Ortiz".to_string()),
        subject: None,
        created_at: None,
    }
}

pub fn post(id: PostId, session_id: ClassSessionId, title: &str) -> Post {
    Post {
        id,
        session_id,
        title: title.to_string(),
        content: format!("{} body", title),
        author_name: Some("Dana Ortiz".to_string()),
        created_at: Utc.with_ymd_and_hms(2026, 10, 1, 10, 0, 0).unwrap(),
        comments: Vec::new(),
    }
}

pub fn class_session(id: ClassSessionId, title: &str) -> ClassSession {
    ClassSession {
        id,
        title: title.to_string(),
        tutor_name: Some("Dana Ortiz".to_string()),
        day_of_week: Some(DayOfWeek::Tuesday),
        start_time: Some(time(15, 0)),
        end_time: Some(time(16, 0)),
        location: None,
    }
}

/// Canned failure for the next call
pub enum Failure {
    Rejected(u16, &'static str),
    Network,
}

#[derive(Default)]
struct Backend {
    accounts: Vec<(String, String, User)>,
    current: Option<User>,
    slots: Vec<AvailabilitySlot>,
    bookings: Vec<BookingRequest>,
    schedule: Vec<ScheduleEntry>,
    sessions: Vec<ClassSession>,
    posts: Vec<Post>,
    next_id: i64,
    calls: Vec<&'static str>,
    fail_next: Option<Failure>,
}

impl Backend {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn begin(&mut self, call: &'static str) -> Result<()> {
        self.calls.push(call);
        match self.fail_next.take() {
            Some(Failure::Rejected(status, message)) => Err(Error::Rejected {
                status,
                message: message.to_string(),
            }),
            Some(Failure::Network) => Err(Error::Timeout),
            None => Ok(()),
        }
    }

    fn current(&self) -> Result<User> {
        self.current.clone().ok_or(Error::Unauthorized { status: 401 })
    }
}

#[derive(Default)]
pub struct MemoryApi {
    backend: Mutex<Backend>,
    comment_gates: Mutex<HashMap<PostId, Arc<Notify>>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        let api = Self::default();
        {
            let mut backend = lock(&api.backend);
            backend.next_id = 100;
            for user in [student(), tutor(), admin()] {
                backend
                    .accounts
                    .push((user.email.clone(), "secret".to_string(), user));
            }
        }
        api
    }

    /// Start with a session already established
    pub fn logged_in_as(self, user: User) -> Self {
        lock(&self.backend).current = Some(user);
        self
    }

    pub fn with_slots(self, slots: Vec<AvailabilitySlot>) -> Self {
        lock(&self.backend).slots = slots;
        self
    }

    pub fn with_bookings(self, bookings: Vec<BookingRequest>) -> Self {
        lock(&self.backend).bookings = bookings;
        self
    }

    pub fn with_schedule(self, schedule: Vec<ScheduleEntry>) -> Self {
        lock(&self.backend).schedule = schedule;
        self
    }

    pub fn with_community(self, sessions: Vec<ClassSession>, posts: Vec<Post>) -> Self {
        let mut backend = lock(&self.backend);
        backend.sessions = sessions;
        backend.posts = posts;
        drop(backend);
        self
    }

    pub fn fail_next(&self, failure: Failure) {
        lock(&self.backend).fail_next = Some(failure);
    }

    /// Hold comment submissions on a post until the returned handle is notified
    pub fn hold_comments_on(&self, post_id: PostId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.comment_gates).insert(post_id, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.backend).calls.clone()
    }

    pub fn call_count(&self, call: &str) -> usize {
        lock(&self.backend).calls.iter().filter(|c| **c == call).count()
    }

    /// Authoritative status of a booking, bypassing the API
    pub fn booking_status(&self, id: BookingId) -> Option<BookingStatus> {
        lock(&self.backend)
            .bookings
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.status)
    }

    /// Book a slot as some other student would
    pub fn book_elsewhere(&self, slot_id: i64) {
        let mut backend = lock(&self.backend);
        if let Some(slot) = backend.slots.iter_mut().find(|s| s.id == slot_id) {
            slot.is_booked = true;
        }
    }
}

/// App state over a fresh in-memory backend
pub fn app_state(api: MemoryApi) -> (AppState, Arc<MemoryApi>) {
    let api = Arc::new(api);
    let state = AppState::new(api.clone());
    let user = lock(&api.backend).current.clone();
    state.session.set_user(user);
    (state, api)
}

#[async_trait::async_trait]
impl TutoringApi for MemoryApi {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        let mut backend = lock(&self.backend);
        backend.begin("login")?;
        let user = backend
            .accounts
            .iter()
            .find(|(email, password, _)| {
                *email == credentials.email && *password == credentials.password
            })
            .map(|(_, _, user)| user.clone())
            .ok_or(Error::Unauthorized { status: 401 })?;
        backend.current = Some(user);
        Ok(())
    }

    async fn current_user(&self) -> Result<User> {
        let mut backend = lock(&self.backend);
        backend.begin("current_user")?;
        backend.current()
    }

    async fn logout(&self) -> Result<()> {
        let mut backend = lock(&self.backend);
        backend.begin("logout")?;
        backend.current = None;
        Ok(())
    }

    async fn list_availabilities(&self) -> Result<Vec<AvailabilitySlot>> {
        let mut backend = lock(&self.backend);
        backend.begin("list_availabilities")?;
        Ok(backend.slots.clone())
    }

    async fn my_bookings(&self) -> Result<Vec<BookingRequest>> {
        let mut backend = lock(&self.backend);
        backend.begin("my_bookings")?;
        let user = backend.current()?;
        Ok(backend
            .bookings
            .iter()
            .filter(|b| b.student_id == user.id)
            .cloned()
            .collect())
    }

    async fn request_booking(&self, request: &NewBookingRequest) -> Result<BookingRequest> {
        let mut backend = lock(&self.backend);
        backend.begin("request_booking")?;
        let user = backend.current()?;

        let slot = backend
            .slots
            .iter_mut()
            .find(|s| s.id == request.availability_id)
            .ok_or_else(|| Error::Rejected {
                status: 404,
                message: "Slot not found".to_string(),
            })?;
        if slot.is_booked {
            return Err(Error::Rejected {
                status: 409,
                message: "This slot has already been booked".to_string(),
            });
        }
        slot.is_booked = true;
        let slot = slot.clone();

        let id = backend.next_id();
        let booking = BookingRequest {
            id,
            student_id: user.id,
            tutor_id: slot.tutor_id,
            availability_id: Some(slot.id),
            date: slot.date,
            start_time: Some(slot.start_time),
            end_time: Some(slot.end_time),
            status: BookingStatus::Pending,
            notes: Some(request.notes.clone()).filter(|n| !n.is_empty()),
            meeting_link: None,
            student_name: Some(user.name),
            tutor_name: slot.tutor_name,
            subject: slot.subject,
            created_at: Some(Utc::now()),
        };
        backend.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn tutor_schedule(&self) -> Result<Vec<ScheduleEntry>> {
        let mut backend = lock(&self.backend);
        backend.begin("tutor_schedule")?;
        Ok(backend.schedule.clone())
    }

    async fn create_schedule_entry(&self, entry: &NewScheduleEntry) -> Result<ScheduleEntry> {
        let mut backend = lock(&self.backend);
        backend.begin("create_schedule_entry")?;

        if entry.end_time <= entry.start_time {
            return Err(Error::Rejected {
                status: 400,
                message: "End time must be after start time".to_string(),
            });
        }
        let overlaps = backend.schedule.iter().any(|e| {
            e.day_of_week == entry.day_of_week
                && entry.start_time < e.end_time
                && e.start_time < entry.end_time
        });
        if overlaps {
            return Err(Error::Rejected {
                status: 409,
                message: "Overlaps an existing availability".to_string(),
            });
        }

        let created = ScheduleEntry {
            id: backend.next_id(),
            day_of_week: entry.day_of_week,
            start_time: entry.start_time,
            end_time: entry.end_time,
        };
        // Backend returns rows in insertion order
        backend.schedule.push(created.clone());
        Ok(created)
    }

    async fn delete_schedule_entry(&self, id: ScheduleEntryId) -> Result<()> {
        let mut backend = lock(&self.backend);
        backend.begin("delete_schedule_entry")?;
        let before = backend.schedule.len();
        backend.schedule.retain(|e| e.id != id);
        if backend.schedule.len() == before {
            return Err(Error::Rejected {
                status: 404,
                message: "Schedule entry not found".to_string(),
            });
        }
        Ok(())
    }

    async fn tutor_booking_requests(&self) -> Result<Vec<BookingRequest>> {
        let mut backend = lock(&self.backend);
        backend.begin("tutor_booking_requests")?;
        let user = backend.current()?;
        Ok(backend
            .bookings
            .iter()
            .filter(|b| b.tutor_id == user.id)
            .cloned()
            .collect())
    }

    async fn decide_booking_request(
        &self,
        id: BookingId,
        decision: BookingDecision,
    ) -> Result<BookingRequest> {
        let mut backend = lock(&self.backend);
        backend.begin("decide_booking_request")?;
        let booking = backend
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| Error::Rejected {
                status: 404,
                message: "Request not found".to_string(),
            })?;
        booking.status = booking
            .status
            .transition(decision.target_status())
            .map_err(|_| Error::Rejected {
                status: 409,
                message: "Request is no longer pending".to_string(),
            })?;
        Ok(booking.clone())
    }

    async fn community_sessions(&self) -> Result<Vec<ClassSession>> {
        let mut backend = lock(&self.backend);
        backend.begin("community_sessions")?;
        Ok(backend.sessions.clone())
    }

    async fn community_posts(&self, session_id: ClassSessionId) -> Result<Vec<Post>> {
        let mut backend = lock(&self.backend);
        backend.begin("community_posts")?;
        Ok(backend
            .posts
            .iter()
            .filter(|p| p.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn create_post(&self, post: &NewPost) -> Result<()> {
        let mut backend = lock(&self.backend);
        backend.begin("create_post")?;
        let user = backend.current()?;
        let id = backend.next_id();
        backend.posts.push(Post {
            id,
            session_id: post.session_id,
            title: post.title.clone(),
            content: post.content.clone(),
            author_name: Some(user.name),
            created_at: Utc::now(),
            comments: Vec::new(),
        });
        Ok(())
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<()> {
        let gate = lock(&self.comment_gates).get(&comment.post_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut backend = lock(&self.backend);
        backend.begin("create_comment")?;
        let user = backend.current()?;
        let id = backend.next_id();
        let post = backend
            .posts
            .iter_mut()
            .find(|p| p.id == comment.post_id)
            .ok_or_else(|| Error::Rejected {
                status: 404,
                message: "Post not found".to_string(),
            })?;
        post.comments.push(Comment {
            id,
            post_id: comment.post_id,
            content: comment.content.clone(),
            author_name: Some(user.name),
            created_at: Utc::now(),
        });
        Ok(())
    }
}
