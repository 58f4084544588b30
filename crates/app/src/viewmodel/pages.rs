//! Profile, feedback, library, reports, matching and session record pages
//!
//! These pages have no backend endpoints. They work on the sample data in
//! `tutorhub_core::catalog` or on local form state, and report success
//! through toasts without persisting anything.

use std::sync::Mutex;

use tracing::info;
use tutorhub_core::catalog::{
    self, LibraryResource, SessionRecord, StudentNeed, TutorProfile,
};
use tutorhub_core::forms::validate_rating;
use tutorhub_core::insights::{rank_tutors, report_overview, MatchSuggestion, ReportOverview};
use tutorhub_core::{Action, User, ValidationError};

use super::{report_invalid, require, ActionError};
use crate::state::{lock, AppState};

/// Editable profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub phone: String,
    pub bio: String,
}

impl ProfileForm {
    fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            bio: user.bio.clone().unwrap_or_default(),
        }
    }
}

pub struct ProfileViewModel {
    state: AppState,
    form: Mutex<ProfileForm>,
}

impl ProfileViewModel {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            form: Mutex::new(ProfileForm::default()),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.state.session.current_user()
    }

    /// Start editing from the session user's current values
    pub fn edit(&self) -> ProfileForm {
        let form = self
            .user()
            .map(|u| ProfileForm::from_user(&u))
            .unwrap_or_default();
        *lock(&self.form) = form.clone();
        form
    }

    pub fn form(&self) -> ProfileForm {
        lock(&self.form).clone()
    }

    pub fn set_form(&self, form: ProfileForm) {
        *lock(&self.form) = form;
    }

    pub fn save(&self) -> Result<ProfileForm, ActionError> {
        require(&self.state.session, Action::EditProfile)?;

        let form = self.form();
        if form.name.trim().is_empty() {
            return Err(report_invalid(
                &self.state.notifier,
                ValidationError::MissingField("Name"),
            ));
        }
        info!(name = %form.name.trim(), "Profile saved locally");
        self.state.notifier.success("Profile updated");
        Ok(form)
    }
}

pub struct FeedbackViewModel {
    state: AppState,
    records: Mutex<Vec<SessionRecord>>,
}

impl FeedbackViewModel {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            records: Mutex::new(catalog::session_records()),
        }
    }

    /// Attended sessions of the logged-in student
    pub fn sessions(&self) -> Vec<SessionRecord> {
        let Some(user) = self.state.session.current_user() else {
            return Vec::new();
        };
        lock(&self.records)
            .iter()
            .filter(|r| r.attended && r.student_name == user.name)
            .cloned()
            .collect()
    }

    pub fn submit(&self, record_id: u32, rating: u8, comment: &str) -> Result<(), ActionError> {
        require(&self.state.session, Action::SubmitFeedback)?;
        let rating =
            validate_rating(rating).map_err(|e| report_invalid(&self.state.notifier, e))?;

        if !self.sessions().iter().any(|r| r.id == record_id) {
            return Err(ActionError::NotFound);
        }
        let mut records = lock(&self.records);
        if let Some(record) = records.iter_mut().find(|r| r.id == record_id) {
            record.rating = Some(rating);
            if !comment.trim().is_empty() {
                record.notes = comment.trim().to_string();
            }
        }
        drop(records);

        info!(record_id, rating, "Feedback submitted");
        self.state.notifier.success("Thanks for your feedback");
        Ok(())
    }
}

pub struct LibraryViewModel {
    resources: Vec<LibraryResource>,
}

impl LibraryViewModel {
    pub fn new() -> Self {
        Self {
            resources: catalog::library_resources(),
        }
    }

    pub fn resources(&self) -> &[LibraryResource] {
        &self.resources
    }

    /// Case-insensitive match on title, subject or author; blank returns all
    pub fn search(&self, query: &str) -> Vec<LibraryResource> {
        let needle = query.trim().to_lowercase();
        self.resources
            .iter()
            .filter(|r| {
                needle.is_empty()
                    || r.title.to_lowercase().contains(&needle)
                    || r.subject.to_lowercase().contains(&needle)
                    || r.author.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

impl Default for LibraryViewModel {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ReportsViewModel {
    state: AppState,
}

impl ReportsViewModel {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn overview(&self) -> Result<ReportOverview, ActionError> {
        require(&self.state.session, Action::ViewReports)?;
        Ok(report_overview(&catalog::session_records()))
    }
}

pub struct MatchingViewModel {
    state: AppState,
    students: Vec<StudentNeed>,
    tutors: Vec<TutorProfile>,
}

impl MatchingViewModel {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            students: catalog::student_needs(),
            tutors: catalog::tutor_profiles(),
        }
    }

    pub fn students(&self) -> Result<&[StudentNeed], ActionError> {
        require(&self.state.session, Action::RunMatching)?;
        Ok(&self.students)
    }

    pub fn suggestions(&self, student_id: u32) -> Result<Vec<MatchSuggestion>, ActionError> {
        require(&self.state.session, Action::RunMatching)?;
        let student = self
            .students
            .iter()
            .find(|s| s.id == student_id)
            .ok_or(ActionError::NotFound)?;
        Ok(rank_tutors(student, &self.tutors))
    }

    pub fn assign(&self, student_id: u32, tutor_id: u32) -> Result<(), ActionError> {
        require(&self.state.session, Action::RunMatching)?;
        let student = self
            .students
            .iter()
            .find(|s| s.id == student_id)
            .ok_or(ActionError::NotFound)?;
        let tutor = self
            .tutors
            .iter()
            .find(|t| t.id == tutor_id)
            .ok_or(ActionError::NotFound)?;

        info!(student = %student.name, tutor = %tutor.name, "Match assigned");
        self.state
            .notifier
            .success(format!("{} assigned to {}", student.name, tutor.name));
        Ok(())
    }
}

pub struct SessionRecordViewModel {
    state: AppState,
    records: Mutex<Vec<SessionRecord>>,
}

impl SessionRecordViewModel {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            records: Mutex::new(catalog::session_records()),
        }
    }

    /// Sessions taught by the logged-in tutor
    pub fn sessions(&self) -> Vec<SessionRecord> {
        let Some(user) = self.state.session.current_user() else {
            return Vec::new();
        };
        lock(&self.records)
            .iter()
            .filter(|r| r.tutor_name == user.name)
            .cloned()
            .collect()
    }

    pub fn record(&self, id: u32, attended: bool, notes: &str) -> Result<SessionRecord, ActionError> {
        require(&self.state.session, Action::RecordSession)?;
        let tutor = self
            .state
            .session
            .current_user()
            .ok_or(ActionError::Unauthenticated)?;

        let mut records = lock(&self.records);
        let record = records
            .iter_mut()
            .find(|r| r.id == id && r.tutor_name == tutor.name)
            .ok_or(ActionError::NotFound)?;
        record.attended = attended;
        record.notes = notes.trim().to_string();
        let updated = record.clone();
        drop(records);

        info!(record_id = id, attended, "Session recorded");
        self.state.notifier.success("Session record saved");
        Ok(updated)
    }
}
